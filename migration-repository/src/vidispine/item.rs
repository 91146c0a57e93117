//! Items, collections and shapes returned by Vidispine searches.

use serde::{Deserialize, Serialize};

use super::metadata::Metadata;

/// A file belonging to a shape component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VidispineFile {
    pub id: String,
    /// File name relative to its storage.
    pub path: String,
    pub uri: Vec<String>,
    pub state: String,
    pub size: i64,
    pub hash: String,
}

/// A container, audio or video component of a shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeComponent {
    pub format: String,
    pub file: Vec<VidispineFile>,
}

/// One rendition of an item (original, proxies, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VidispineShape {
    pub id: String,
    pub essence_version: i32,
    pub tag: Vec<String>,
    pub mime_type: Vec<String>,
    pub container_component: ShapeComponent,
    pub audio_component: Vec<ShapeComponent>,
    pub video_component: Vec<ShapeComponent>,
}

impl VidispineShape {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag.iter().any(|t| t == tag)
    }

    /// Every file of every component: container first, then video, then audio.
    pub fn all_files(&self) -> Vec<&VidispineFile> {
        self.container_component
            .file
            .iter()
            .chain(self.video_component.iter().flat_map(|c| c.file.iter()))
            .chain(self.audio_component.iter().flat_map(|c| c.file.iter()))
            .collect()
    }

    /// Unique file URIs starting with `prefix`, in first-seen order.
    ///
    /// Pass an empty prefix to get every URI.
    pub fn uris(&self, prefix: &str) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for file in self.all_files() {
            for uri in &file.uri {
                if uri.starts_with(prefix) && !seen.contains(uri) {
                    seen.push(uri.clone());
                }
            }
        }
        seen
    }
}

/// A Vidispine item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VidispineItem {
    #[serde(rename = "id")]
    pub item_id: String,
    #[serde(rename = "shape")]
    pub shapes: Vec<VidispineShape>,
    pub metadata: Metadata,
}

impl VidispineItem {
    /// Shapes carrying the given tag.
    pub fn find_shape_for(&self, tag: &str) -> Vec<&VidispineShape> {
        self.shapes.iter().filter(|s| s.has_tag(tag)).collect()
    }

    /// The best available proxy: video, then audio, then image.
    pub fn proxy_shape(&self) -> Option<&VidispineShape> {
        ["lowres", "lowaudio", "lowimage"]
            .iter()
            .find_map(|tag| self.find_shape_for(tag).into_iter().next())
    }

    pub fn original_shape(&self) -> Option<&VidispineShape> {
        self.find_shape_for("original").into_iter().next()
    }
}

/// A Vidispine collection. Projects and commissions are stored as collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VidispineCollection {
    pub id: String,
    pub name: String,
    pub metadata: Metadata,
}
