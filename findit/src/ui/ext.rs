use std::ops::RangeInclusive;

pub trait UiExt {
	/// Vertical gap followed by a separator.
	fn spacer(&mut self);

	/// Labelled drag value clamped to `range`.
	fn num_edit_range<N: egui::emath::Numeric>(
		&mut self,
		value: &mut N,
		label: impl Into<egui::WidgetText>,
		range: RangeInclusive<N>,
	) -> egui::Response;
}

impl UiExt for egui::Ui {
	fn spacer(&mut self) {
		self.add_space(8.0);
		self.separator();
		self.add_space(8.0);
	}

	fn num_edit_range<N: egui::emath::Numeric>(
		&mut self,
		value: &mut N,
		label: impl Into<egui::WidgetText>,
		range: RangeInclusive<N>,
	) -> egui::Response {
		self.horizontal(|ui| {
			let response = ui.add(egui::DragValue::new(value).range(range));
			ui.label(label);
			response
		})
		.inner
	}
}
