//! Pages that only show text and point elsewhere.

/// Admin console the goods manager page links to.
pub const GOODS_MANAGER_URL: &str = "https://www.baidu.com";

/// A page without drive access: a title, some text and an optional link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticPage {
    pub title: String,
    pub body: String,
    pub link: Option<String>,
}

impl StaticPage {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            link: None,
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// The goods manager is an external admin site; the page only points at it.
    pub fn goods_manager() -> Self {
        Self::new(
            "Goods Manager",
            "Goods are managed in the external admin console.",
        )
        .with_link(GOODS_MANAGER_URL)
    }
}
