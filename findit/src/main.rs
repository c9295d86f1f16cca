fn main() -> eframe::Result<()> {
	// Structured logging. Use `RUST_LOG=info` etc.
	tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.init();

	let locale = findit::config().locale.clone();
	findit::i18n::init(locale.as_deref());

	let options = eframe::NativeOptions {
		viewport: egui::ViewportBuilder::default()
			.with_title(findit::tr!("app-title"))
			.with_inner_size([520.0, 760.0])
			.with_resizable(false),
		..Default::default()
	};

	eframe::run_native(
		"FindIt",
		options,
		Box::new(|cc| Ok(Box::new(findit::ui::FindIt::new(cc)))),
	)
}
