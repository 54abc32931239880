//! # Menu Items
//!
//! One node in the catalog tree. The tree itself is implicit: a flat list
//! of `MenuItem`s where `parent_id` points at the containing folder and
//! the list order (filtered by parent) is the display order.
//!
//! ```text
//! MenuItemType          group     folder?  recycle bucket
//! ├── ApiDetailFolder   Http      yes      -
//! ├── ApiDetail         Http      no       Http
//! ├── Doc               Http      no       Http (folded)
//! ├── ApiSchemaFolder   Schema    yes      -
//! ├── ApiSchema         Schema    no       Schema
//! ├── RequestFolder     Request   yes      -
//! └── HttpRequest       Request   no       Request
//! ```

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::recycle::RecycleCategory;

/// Parent id the remote store uses for top-level items.
pub const REMOTE_ROOT_ID: &str = "1";

/// Id of the synthetic "project overview" entry.
pub const OVERVIEW_ID: &str = "overview";

/// Id of the synthetic "recycle bin" entry.
pub const RECYCLE_BIN_ID: &str = "recycle";

/// Returns true for the synthetic top-level entries that sit outside
/// normal tree mutation rules.
pub fn is_pseudo_root(id: &str) -> bool {
    id == OVERVIEW_ID || id == RECYCLE_BIN_ID
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum MenuItemType {
    ApiDetailFolder,
    ApiDetail,
    Doc,
    ApiSchemaFolder,
    ApiSchema,
    RequestFolder,
    HttpRequest,
}

/// The independent sub-trees of a catalog. Items never move between groups.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum CatalogGroup {
    Http,
    Schema,
    Request,
}

impl MenuItemType {
    /// Folder-like types may own children; everything else is a leaf.
    pub fn is_folder(self) -> bool {
        matches!(
            self,
            MenuItemType::ApiDetailFolder | MenuItemType::ApiSchemaFolder | MenuItemType::RequestFolder
        )
    }

    pub fn group(self) -> CatalogGroup {
        match self {
            MenuItemType::ApiDetailFolder | MenuItemType::ApiDetail | MenuItemType::Doc => {
                CatalogGroup::Http
            }
            MenuItemType::ApiSchemaFolder | MenuItemType::ApiSchema => CatalogGroup::Schema,
            MenuItemType::RequestFolder | MenuItemType::HttpRequest => CatalogGroup::Request,
        }
    }

    /// The recycle bucket a deleted item of this type is archived under.
    ///
    /// Folders have no bucket: deleting one discards the folder node and
    /// archives only its leaves. Docs share the Http bucket.
    pub fn recycle_category(self) -> Option<RecycleCategory> {
        match self {
            MenuItemType::ApiDetail | MenuItemType::Doc => Some(RecycleCategory::Http),
            MenuItemType::ApiSchema => Some(RecycleCategory::Schema),
            MenuItemType::HttpRequest => Some(RecycleCategory::Request),
            MenuItemType::ApiDetailFolder
            | MenuItemType::ApiSchemaFolder
            | MenuItemType::RequestFolder => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuItemType::ApiDetailFolder => "folder",
            MenuItemType::ApiDetail => "endpoint",
            MenuItemType::Doc => "doc",
            MenuItemType::ApiSchemaFolder => "schema folder",
            MenuItemType::ApiSchema => "schema",
            MenuItemType::RequestFolder => "request folder",
            MenuItemType::HttpRequest => "request",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    /// `None` means top-level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: MenuItemType,
    /// Kind-specific payload, opaque to the tree engine.
    #[serde(default)]
    pub data: serde_json::Value,
}

impl MenuItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: MenuItemType) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            name: name.into(),
            kind,
            data: serde_json::Value::Null,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    pub fn is_folder(&self) -> bool {
        self.kind.is_folder()
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// A partial edit keyed by id. Only `name` and `data` are editable.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MenuPatch {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl MenuPatch {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}
