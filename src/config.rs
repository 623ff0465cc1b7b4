use crate::ColorMatcher;

#[derive(Debug, Clone, Copy, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[non_exhaustive]
#[serde(default)]
pub struct SelectionSettings {
    /// Maximal per-channel color distance for the color wand.
    pub tolerance: u8,
    /// Color wand selects matching pixels anywhere instead of only the
    /// regions connected to the click.
    pub whole_figure: bool,
    /// Color wand compares the alpha channel too.
    pub use_alpha: bool,
    /// Grow pixel selections to the full extent of every touched component.
    pub auto_expand: bool,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            tolerance: 30,
            whole_figure: false,
            use_alpha: false,
            auto_expand: false,
        }
    }
}

impl SelectionSettings {
    pub fn matcher(&self) -> ColorMatcher {
        ColorMatcher::new(self.tolerance, self.use_alpha)
    }
}
