//! Page controllers, one per panel tab.
//!
//! File pages (models, grasp-teach, map, audio) share one controller
//! parameterised by a [`PageSpec`]; the object config page edits a single
//! YAML document; the goods manager page is static.

pub mod config_page;
pub mod file_page;
pub mod static_page;

use std::fmt;
use std::str::FromStr;

use crate::resolver::{AllowedExtensions, UploadPolicy};

pub use config_page::{ConfigPageController, ConfigPageError, ConfigSpec};
pub use file_page::{DeleteReport, FilePageController, StagedUpload};
pub use static_page::StaticPage;

const MIB: u64 = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    Models,
    GraspTeach,
    Map,
    Audio,
    ObjectConfig,
    GoodsManager,
}

impl PageKind {
    pub const ALL: [Self; 6] = [
        Self::Models,
        Self::GraspTeach,
        Self::Map,
        Self::Audio,
        Self::ObjectConfig,
        Self::GoodsManager,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Self::Models => "models",
            Self::GraspTeach => "grasp-teach",
            Self::Map => "map",
            Self::Audio => "audio",
            Self::ObjectConfig => "object-config",
            Self::GoodsManager => "goods-manager",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Models => "Model Files",
            Self::GraspTeach => "Grasp Teach Files",
            Self::Map => "Map Update",
            Self::Audio => "Audio Update",
            Self::ObjectConfig => "Object Config",
            Self::GoodsManager => "Goods Manager",
        }
    }

    /// Built-in layout of the page.
    pub fn layout(self) -> PageLayout {
        match self {
            Self::Models => PageLayout::Files(PageSpec::new(
                self,
                "/retail/models/",
                UploadPolicy::new(AllowedExtensions::only(["onnx", "pt", "pb"]), 512 * MIB),
            )),
            Self::GraspTeach => PageLayout::Files(PageSpec::new(
                self,
                "/retail/grasp-teach/",
                UploadPolicy::new(AllowedExtensions::Any, 512 * MIB),
            )),
            Self::Map => PageLayout::Files(
                PageSpec::new(
                    self,
                    "/retail/map/",
                    UploadPolicy::new(
                        AllowedExtensions::only(["pgm", "png", "yaml", "yml"]),
                        256 * MIB,
                    ),
                )
                .single_file(),
            ),
            Self::Audio => PageLayout::Files(PageSpec::new(
                self,
                "/retail/audio/",
                UploadPolicy::new(AllowedExtensions::only(["mp3", "wav"]), 5 * MIB),
            )),
            Self::ObjectConfig => PageLayout::Config(ConfigSpec::default()),
            Self::GoodsManager => PageLayout::Static(StaticPage::goods_manager()),
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPage(pub String);

impl fmt::Display for UnknownPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let known: Vec<_> = PageKind::ALL.iter().map(|k| k.slug()).collect();
        write!(f, "unknown page '{}' (expected one of: {})", self.0, known.join(", "))
    }
}

impl std::error::Error for UnknownPage {}

impl FromStr for PageKind {
    type Err = UnknownPage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|kind| kind.slug() == wanted)
            .ok_or_else(|| UnknownPage(s.to_owned()))
    }
}

/// What a page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageLayout {
    Files(PageSpec),
    Config(ConfigSpec),
    Static(StaticPage),
}

/// How many files one upload may carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionMode {
    #[default]
    Multiple,
    /// The page holds one file; one upload carries at most one file.
    Single,
}

/// Base path and file-type policy of a file page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSpec {
    pub kind: PageKind,
    pub base_path: String,
    pub policy: UploadPolicy,
    pub mode: SelectionMode,
}

impl PageSpec {
    pub fn new(kind: PageKind, base_path: impl Into<String>, policy: UploadPolicy) -> Self {
        Self {
            kind,
            base_path: base_path.into(),
            policy,
            mode: SelectionMode::Multiple,
        }
    }

    pub fn single_file(mut self) -> Self {
        self.mode = SelectionMode::Single;
        self
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn with_max_size(mut self, max_size_bytes: u64) -> Self {
        self.policy.max_size_bytes = max_size_bytes;
        self
    }

    pub fn title(&self) -> &'static str {
        self.kind.title()
    }
}
