//! Catalogs of placeable prefabs.
//!
//! A catalog is the ordered list of prefabs in the active category. The
//! [`DirectoryCatalog`] provider builds categories from the immediate
//! subdirectories of a root folder and catalogs from the prefab files inside
//! each of them.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use thiserror::Error;

/// Default extension of prefab files.
pub const DEFAULT_PREFAB_EXTENSION: &str = "glb";

/// Default extension of thumbnail images stored next to prefab files.
pub const DEFAULT_THUMBNAIL_EXTENSION: &str = "png";

/// Errors raised while scanning a catalog directory.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A directory could not be read or created.
    #[error("failed to read catalog directory {path:?}: {source}")]
    Io {
        /// Directory that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A file or directory name is not valid UTF-8.
    #[error("catalog entry {path:?} does not have a valid UTF-8 name")]
    InvalidName {
        /// Offending entry.
        path: PathBuf,
    },
}

/// A named partition of the catalog, backed by a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Directory name, shown as the tab label.
    pub name: String,
    /// Location on disk.
    pub path: PathBuf,
}

/// Ordered list of placeable prefabs for one category.
///
/// Possibly empty. Indexing is bounds-checked: an index past
/// the end addresses no prefab rather than panicking.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog<P> {
    items: Vec<P>,
}

impl<P> Catalog<P> {
    /// Catalog of `items`, in display order.
    pub fn new(items: Vec<P>) -> Self {
        Self { items }
    }

    /// The prefab at `index`, or `None` when the index is out of range.
    pub fn get(&self, index: usize) -> Option<&P> {
        self.items.get(index)
    }

    /// Number of prefabs.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog has no prefabs.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Prefabs in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, P> {
        self.items.iter()
    }
}

impl<P> Default for Catalog<P> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<P> FromIterator<P> for Catalog<P> {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Source of categories, prefabs and thumbnails.
pub trait CatalogProvider {
    /// Loadable reference to a prefab.
    type Prefab;
    /// Preview image of a prefab.
    type Thumbnail;

    /// Categories below `root`, in display order.
    fn list_categories(&self, root: &Path) -> Result<Vec<Category>, CatalogError>;

    /// Prefabs of the category stored at `category_path`, in display order.
    fn list_prefabs(&self, category_path: &Path) -> Result<Vec<Self::Prefab>, CatalogError>;

    /// Preview thumbnail for `prefab`, if one exists.
    fn thumbnail(&self, prefab: &Self::Prefab) -> Option<Self::Thumbnail>;
}

/// A prefab file discovered by [`DirectoryCatalog`].
#[derive(Debug, Clone, PartialEq)]
pub struct PrefabRef {
    /// File stem, used as display name.
    pub name: String,
    /// Location on disk.
    pub path: PathBuf,
    /// Location relative to the asset root, as understood by the `AssetServer`.
    pub asset_path: PathBuf,
    /// Local half extents used until the preview's meshes have loaded, before scale.
    pub half_extents: Vec3,
}

/// Filesystem-backed [`CatalogProvider`].
///
/// Categories are the immediate subdirectories of the root sorted by name.
/// Prefabs are the files of a category whose extension matches
/// `prefab_extension`, sorted by name. A thumbnail is an image next to the
/// prefab with the same stem.
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    asset_root: PathBuf,
    prefab_extension: String,
    thumbnail_extension: String,
    half_extents: Vec3,
}

impl DirectoryCatalog {
    /// Provider for prefabs stored below `asset_root`.
    pub fn new(asset_root: impl Into<PathBuf>) -> Self {
        Self {
            asset_root: asset_root.into(),
            prefab_extension: DEFAULT_PREFAB_EXTENSION.to_string(),
            thumbnail_extension: DEFAULT_THUMBNAIL_EXTENSION.to_string(),
            half_extents: Vec3::splat(0.5),
        }
    }

    /// Only list prefab files with this extension.
    pub fn with_prefab_extension(mut self, extension: impl Into<String>) -> Self {
        self.prefab_extension = extension.into();
        self
    }

    /// Look for thumbnails with this extension.
    pub fn with_thumbnail_extension(mut self, extension: impl Into<String>) -> Self {
        self.thumbnail_extension = extension.into();
        self
    }

    /// Fallback bounds for the prefabs this provider lists, used until a
    /// preview's meshes have loaded.
    pub fn with_half_extents(mut self, half_extents: Vec3) -> Self {
        self.half_extents = half_extents;
        self
    }

    fn asset_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.asset_root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf())
    }

    fn has_extension(path: &Path, extension: &str) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
    }
}

fn read_entries(dir: &Path) -> Result<Vec<fs::DirEntry>, CatalogError> {
    let io_err = |source| CatalogError::Io {
        path: dir.to_path_buf(),
        source,
    };
    fs::read_dir(dir)
        .map_err(io_err)?
        .map(|entry| entry.map_err(io_err))
        .collect()
}

fn entry_name(path: &Path, name: Option<&std::ffi::OsStr>) -> Result<String, CatalogError> {
    name.and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| CatalogError::InvalidName {
            path: path.to_path_buf(),
        })
}

impl CatalogProvider for DirectoryCatalog {
    type Prefab = PrefabRef;
    type Thumbnail = PathBuf;

    fn list_categories(&self, root: &Path) -> Result<Vec<Category>, CatalogError> {
        let mut categories = Vec::new();
        for entry in read_entries(root)? {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let name = entry_name(&path, path.file_name())?;
            categories.push(Category { name, path });
        }
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    fn list_prefabs(&self, category_path: &Path) -> Result<Vec<PrefabRef>, CatalogError> {
        // A freshly named category has no folder yet.
        fs::create_dir_all(category_path).map_err(|source| CatalogError::Io {
            path: category_path.to_path_buf(),
            source,
        })?;

        let mut prefabs = Vec::new();
        for entry in read_entries(category_path)? {
            let path = entry.path();
            if !path.is_file() || !Self::has_extension(&path, &self.prefab_extension) {
                continue;
            }
            let name = entry_name(&path, path.file_stem())?;
            prefabs.push(PrefabRef {
                name,
                asset_path: self.asset_path(&path),
                path,
                half_extents: self.half_extents,
            });
        }
        prefabs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(prefabs)
    }

    fn thumbnail(&self, prefab: &PrefabRef) -> Option<PathBuf> {
        let image = prefab.path.with_extension(&self.thumbnail_extension);
        image.is_file().then(|| self.asset_path(&image))
    }
}

/// Category tabs and the prefabs of the active tab.
///
/// Call [`PlacementCatalog::select_tab`] or [`PlacementCatalog::rescan`]
/// from UI code; the catalog system rebuilds the session's catalog on the
/// next frame.
#[derive(Resource)]
pub struct PlacementCatalog {
    provider: DirectoryCatalog,
    root: PathBuf,
    categories: Vec<Category>,
    active_tab: usize,
    prefab_names: Vec<String>,
    thumbnails: Vec<Option<Handle<Image>>>,
    needs_rescan: bool,
    needs_reload: bool,
}

impl PlacementCatalog {
    /// Catalog of the categories below `root`. The first reload scans it.
    pub fn new(provider: DirectoryCatalog, root: impl Into<PathBuf>) -> Self {
        Self {
            provider,
            root: root.into(),
            categories: Vec::new(),
            active_tab: 0,
            prefab_names: Vec::new(),
            thumbnails: Vec::new(),
            needs_rescan: true,
            needs_reload: true,
        }
    }

    /// Directory holding the category folders.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Categories found by the last scan.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Index of the active category.
    pub fn active_tab(&self) -> usize {
        self.active_tab
    }

    /// The active category, if the scan found any.
    pub fn active_category(&self) -> Option<&Category> {
        self.categories.get(self.active_tab)
    }

    /// Display names of the active catalog, in catalog order.
    pub fn prefab_names(&self) -> &[String] {
        &self.prefab_names
    }

    /// Thumbnails of the active catalog, in catalog order.
    pub fn thumbnails(&self) -> &[Option<Handle<Image>>] {
        &self.thumbnails
    }

    /// Switch the active category.
    pub fn select_tab(&mut self, tab: usize) {
        if tab != self.active_tab {
            self.active_tab = tab;
            self.needs_reload = true;
        }
    }

    /// Re-read the category folders from disk.
    pub fn rescan(&mut self) {
        self.needs_rescan = true;
        self.needs_reload = true;
    }

    /// Rebuild the active catalog if a tab switch or rescan is pending.
    ///
    /// Returns the new catalog, or `None` when nothing was pending.
    /// Directory errors are logged and produce an empty catalog.
    pub fn reload(
        &mut self,
        mut load_thumbnail: impl FnMut(PathBuf) -> Handle<Image>,
    ) -> Option<Catalog<PrefabRef>> {
        if !self.needs_rescan && !self.needs_reload {
            return None;
        }

        if self.needs_rescan {
            self.categories = match self.provider.list_categories(&self.root) {
                Ok(categories) => categories,
                Err(err) => {
                    warn!("[PrefabPlacement] {err}");
                    Vec::new()
                }
            };
            if self.active_tab >= self.categories.len() {
                self.active_tab = 0;
            }
        }
        self.needs_rescan = false;
        self.needs_reload = false;

        let prefabs = match self.active_category() {
            Some(category) => match self.provider.list_prefabs(&category.path) {
                Ok(prefabs) => prefabs,
                Err(err) => {
                    warn!("[PrefabPlacement] {err}");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        self.thumbnails = prefabs
            .iter()
            .map(|prefab| self.provider.thumbnail(prefab).map(&mut load_thumbnail))
            .collect();
        self.prefab_names = prefabs.iter().map(|prefab| prefab.name.clone()).collect();

        debug!(
            "[PrefabPlacement] Loaded {} prefabs for category {:?}",
            prefabs.len(),
            self.active_category().map(|c| c.name.as_str())
        );

        Some(Catalog::new(prefabs))
    }
}
