use crate::tr;
use crate::ui::ext::UiExt;

/// Draw the settings tab. Changes are saved immediately; returns whether anything changed.
pub fn ui(ui: &mut egui::Ui) -> bool {
	let mut config = crate::config();
	let mut changed = false;
	let mut locale_changed = false;

	ui.heading(tr!("settings-narration"));
	changed |= ui.checkbox(&mut config.narration_enabled, tr!("settings-narration-enabled")).changed();
	ui.horizontal(|ui| {
		ui.label(tr!("settings-narration-language"));
		let edit = egui::TextEdit::singleline(&mut config.narration_language).desired_width(80.0);
		changed |= ui.add(edit).lost_focus();
	});

	ui.spacer();
	ui.heading(tr!("settings-display"));
	changed |= ui.num_edit_range(&mut config.ui_zoom_factor, tr!("settings-zoom"), 0.5..=3.0).changed();
	changed |= ui
		.num_edit_range(&mut config.display_width, tr!("settings-display-width"), 100..=1200)
		.changed();
	changed |= ui
		.num_edit_range(&mut config.display_height, tr!("settings-display-height"), 100..=1200)
		.changed();
	ui.small(tr!("settings-display-note"));

	ui.spacer();
	ui.heading(tr!("settings-dataset"));
	match config.dataset_dir() {
		Some(dir) => ui.label(tr!("settings-dataset-dir", path = dir.display().to_string())),
		None => ui.label(tr!("settings-dataset-unset")),
	};
	ui.small(tr!("settings-dataset-env"));

	ui.spacer();
	ui.heading(tr!("settings-language"));
	let system = tr!("settings-language-system");
	let selected = config.locale.clone().unwrap_or_else(|| system.clone());
	egui::ComboBox::from_id_salt("ui-locale").selected_text(selected).show_ui(ui, |ui| {
		locale_changed |= ui.selectable_value(&mut config.locale, None, system).changed();
		for tag in crate::i18n::available() {
			locale_changed |= ui.selectable_value(&mut config.locale, Some(tag.clone()), tag).changed();
		}
	});

	if locale_changed {
		crate::i18n::init(config.locale.as_deref());
	}
	if changed || locale_changed {
		config.save();
	}
	changed || locale_changed
}
