//! Progress reporting for bulk imports. Without the `progress` feature the
//! bar compiles down to nothing.

#[cfg(feature = "progress")]
pub use indicatif::{ProgressBar, ProgressStyle};

#[cfg(not(feature = "progress"))]
pub use self::silent::{ProgressBar, ProgressStyle};

const IMPORT_TEMPLATE: &str = "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} images {msg}";

/// Bar sized to a manifest of `len` images
pub fn import_bar(len: u64) -> ProgressBar {
    let style = ProgressStyle::default_bar()
        .template(IMPORT_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");

    let pb = ProgressBar::new(len);
    pb.set_style(style);
    pb
}

#[cfg(not(feature = "progress"))]
mod silent {
    use std::borrow::Cow;
    use std::convert::Infallible;

    #[derive(Clone)]
    pub struct ProgressBar;

    impl ProgressBar {
        pub fn new(_len: u64) -> Self {
            ProgressBar
        }

        pub fn set_style(&self, _style: ProgressStyle) {}
        pub fn set_message(&self, _msg: impl Into<Cow<'static, str>>) {}
        pub fn inc(&self, _delta: u64) {}
        pub fn finish_with_message(&self, _msg: impl Into<Cow<'static, str>>) {}
    }

    pub struct ProgressStyle;

    impl ProgressStyle {
        pub fn default_bar() -> Self {
            ProgressStyle
        }

        pub fn template(self, _template: &str) -> Result<Self, Infallible> {
            Ok(self)
        }

        pub fn progress_chars(self, _chars: &str) -> Self {
            self
        }
    }
}
