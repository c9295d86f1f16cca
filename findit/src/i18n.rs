use std::sync::LazyLock;

use i18n_embed::{
	DesktopLanguageRequester, LanguageLoader,
	fluent::{FluentLanguageLoader, fluent_language_loader},
};
use rust_embed::RustEmbed;
use unic_langid::LanguageIdentifier;

#[derive(RustEmbed)]
#[folder = "i18n"]
struct Localizations;

static LOADER: LazyLock<FluentLanguageLoader> = LazyLock::new(|| {
	let loader = fluent_language_loader!();
	// Unicode isolation marks show up as boxes in egui labels.
	loader.set_use_isolating(false);
	loader
});

/// Access the global language loader (used by `tr!()`).
pub fn loader() -> &'static FluentLanguageLoader {
	&LOADER
}

/// Initialize localization. If `forced_locale` is provided, it is preferred over the system locale.
pub fn init(forced_locale: Option<&str>) {
	let requested = if let Some(tag) = forced_locale {
		tag.parse::<LanguageIdentifier>().ok().into_iter().collect::<Vec<_>>()
	} else {
		DesktopLanguageRequester::requested_languages()
	};

	// Loading failures fall back to English.
	if let Err(err) = i18n_embed::select(loader(), &Localizations, &requested) {
		tracing::warn!(error = %err, "failed to select UI language");
	}
}

/// Locales bundled with the binary.
pub fn available() -> Vec<String> {
	let mut tags = loader()
		.available_languages(&Localizations)
		.map(|langs| langs.iter().map(ToString::to_string).collect::<Vec<_>>())
		.unwrap_or_default();
	tags.sort();
	tags
}

#[macro_export]
macro_rules! tr {
	($id:literal $($args:tt)*) => {
		i18n_embed_fl::fl!($crate::i18n::loader(), $id $($args)*)
	};
}
