use crate::file_ordering::{compare_paths, natural_cmp, rearrange};
use crate::matter::{MatterTemplate, MATTER_PREFIX};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Reading-order group of a chapter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Group {
    Front,
    Normal,
    Back,
}

/// How a chapter's content is turned into a section.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChapterKind {
    /// Free markdown prose
    Normal,
    /// A key-value block rendered by a matter template
    Matter(MatterTemplate),
}

impl ChapterKind {
    pub fn classify(title: &str) -> ChapterKind {
        match MatterTemplate::from_title(title) {
            Some(template) => ChapterKind::Matter(template),
            None => ChapterKind::Normal,
        }
    }
}

/// One markdown file of the book and how it is bound.
#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub title: String,
    /// Path of the markdown file, relative to the vault
    pub file: PathBuf,
    #[builder(default = "true")]
    #[serde(default = "default_include")]
    pub include: bool,
    #[builder(default)]
    #[serde(default)]
    pub exclude_from_contents: bool,
    #[builder(default)]
    #[serde(default)]
    is_front_matter: bool,
    #[builder(default)]
    #[serde(default)]
    is_back_matter: bool,
}

fn default_include() -> bool {
    true
}

impl ChapterBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.is_front_matter == Some(true) && self.is_back_matter == Some(true) {
            return Err("a chapter cannot be both front and back matter".to_string());
        }
        Ok(())
    }
}

/// The display title a new chapter gets from its file: the stem with any
/// leading digits removed. Matter file stems are kept as they are.
pub fn default_title(file: &Path) -> String {
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    if stem.starts_with(MATTER_PREFIX) {
        return stem;
    }
    strip_leading_digits(&stem)
}

fn strip_leading_digits(s: &str) -> String {
    s.trim_start_matches(|c: char| c.is_ascii_digit())
        .trim()
        .to_string()
}

impl Chapter {
    /// A chapter for a newly discovered file, with matter files pre-flagged.
    pub fn discovered(file: PathBuf) -> Chapter {
        let title = default_title(&file);
        let mut chapter = Chapter {
            title,
            file,
            include: true,
            exclude_from_contents: false,
            is_front_matter: false,
            is_back_matter: false,
        };
        if let ChapterKind::Matter(template) = chapter.kind() {
            if template.is_front() {
                chapter.is_front_matter = true;
            } else {
                chapter.is_back_matter = true;
            }
        }
        chapter
    }

    pub fn file_stem(&self) -> String {
        self.file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn kind(&self) -> ChapterKind {
        ChapterKind::classify(&self.title)
    }

    pub fn is_front_matter(&self) -> bool {
        self.is_front_matter
    }

    pub fn is_back_matter(&self) -> bool {
        self.is_back_matter
    }

    /// Marking a chapter as front matter clears its back matter flag.
    pub fn set_front_matter(&mut self, front: bool) {
        self.is_front_matter = front;
        if front {
            self.is_back_matter = false;
        }
    }

    /// Marking a chapter as back matter clears its front matter flag.
    pub fn set_back_matter(&mut self, back: bool) {
        self.is_back_matter = back;
        if back {
            self.is_front_matter = false;
        }
    }

    /// Chapters loaded from disk may carry both flags; keep front matter.
    pub(crate) fn repair_flags(&mut self) -> bool {
        if self.is_front_matter && self.is_back_matter {
            self.is_back_matter = false;
            true
        } else {
            false
        }
    }

    pub fn group(&self) -> Group {
        if self.is_front_matter {
            Group::Front
        } else if self.is_back_matter {
            Group::Back
        } else {
            Group::Normal
        }
    }

    /// Whether this chapter receives a number in the running count.
    pub fn is_numbered(&self) -> bool {
        self.group() == Group::Normal
    }
}

/// Sort chapters into front matter, normal, back matter order.
pub fn rearrange_chapters(chapters: &mut [Chapter]) {
    rearrange(chapters, Chapter::group);
}

/// Which flag a toggle operation flips.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChapterFlag {
    Include,
    Contents,
    FrontMatter,
    BackMatter,
}

/// A bulk edit of the chapter list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChapterOperation {
    SelectAll,
    SelectNone,
    StripNumbers,
    StripFirstWord,
    RestoreTitles,
    NumberTitles,
    SortByTitle,
    Reverse,
    RestoreOrder,
    Move { from: usize, to: usize },
    Rename { index: usize, title: String },
    Toggle { index: usize, flag: ChapterFlag },
}

fn checked_index(chapters: &[Chapter], index: usize) -> anyhow::Result<()> {
    if index >= chapters.len() {
        anyhow::bail!(
            "There is no chapter {index}, the book has {} chapters",
            chapters.len()
        );
    }
    Ok(())
}

impl ChapterOperation {
    /// Apply the operation, then regroup the list.
    pub fn apply(&self, chapters: &mut Vec<Chapter>) -> anyhow::Result<()> {
        match self {
            ChapterOperation::SelectAll => chapters.iter_mut().for_each(|c| c.include = true),
            ChapterOperation::SelectNone => chapters.iter_mut().for_each(|c| c.include = false),
            ChapterOperation::StripNumbers => chapters
                .iter_mut()
                .for_each(|c| c.title = strip_leading_digits(&c.title)),
            ChapterOperation::StripFirstWord => chapters.iter_mut().for_each(|c| {
                let title = c.title.trim_start();
                let rest = title
                    .find(char::is_whitespace)
                    .map(|i| &title[i..])
                    .unwrap_or_default();
                c.title = rest.trim().to_string();
            }),
            ChapterOperation::RestoreTitles => chapters
                .iter_mut()
                .for_each(|c| c.title = c.file_stem()),
            ChapterOperation::NumberTitles => {
                let mut number = 1;
                for chapter in chapters.iter_mut() {
                    if !chapter.include
                        || !chapter.is_numbered()
                        || chapter.kind() != ChapterKind::Normal
                    {
                        continue;
                    }
                    chapter.title = number.to_string();
                    number += 1;
                }
            }
            ChapterOperation::SortByTitle => {
                chapters.sort_by(|a, b| natural_cmp(&a.title, &b.title))
            }
            ChapterOperation::Reverse => chapters.reverse(),
            ChapterOperation::RestoreOrder => chapters.sort_by(|a, b| compare_paths(&a.file, &b.file)),
            ChapterOperation::Move { from, to } => {
                checked_index(chapters, *from)?;
                checked_index(chapters, *to)?;
                let chapter = chapters.remove(*from);
                chapters.insert(*to, chapter);
            }
            ChapterOperation::Rename { index, title } => {
                checked_index(chapters, *index)?;
                chapters[*index].title = title.clone();
            }
            ChapterOperation::Toggle { index, flag } => {
                checked_index(chapters, *index)?;
                let chapter = &mut chapters[*index];
                match flag {
                    ChapterFlag::Include => chapter.include = !chapter.include,
                    ChapterFlag::Contents => {
                        chapter.exclude_from_contents = !chapter.exclude_from_contents
                    }
                    ChapterFlag::FrontMatter => {
                        let front = !chapter.is_front_matter();
                        chapter.set_front_matter(front);
                    }
                    ChapterFlag::BackMatter => {
                        let back = !chapter.is_back_matter();
                        chapter.set_back_matter(back);
                    }
                }
            }
        }
        rearrange_chapters(chapters);
        Ok(())
    }
}
