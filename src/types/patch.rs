/// Partial update applied to an existing node.
///
/// Only the fields present in the patch are written; everything else is
/// preserved. `id` and `type` are never patchable. Fields that do not apply
/// to the target variant (e.g. `url` on a folder) are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub title: Option<String>,
    pub url: Option<String>,
    pub content: Option<String>,
    pub favicon: Option<String>,
}

impl NodePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn favicon(mut self, favicon: impl Into<String>) -> Self {
        self.favicon = Some(favicon.into());
        self
    }

    /// True when the patch carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.url.is_none() && self.content.is_none() && self.favicon.is_none()
    }
}
