//! # Index Registrar
//!
//! Registers, updates and deletes packages in the static simple index.
//!
//! Every operation checks its required arguments, then the presence or
//! absence of the package, before writing anything. The index file and
//! the package page are written separately; a failure between the two
//! writes leaves them inconsistent.

use std::path::Path;

use serde_json::Value;

use grypi_core::{read_json, GithubContext, PackageName, SiteLayout};

use crate::args::{
    IndexArgs, AUTHOR, DELETE_KEYS, HOMEPAGE, LINK, LONG_DESCRIPTION, NEW_VERSION,
    NEW_VERSION_LINK, PACKAGE_NAME, REGISTER_KEYS, SHORT_DESCRIPTION, UPDATE_KEYS, VERSION,
};
use crate::error::{IndexError, IndexResult};
use crate::index::{read_text, write_text, PackageEntry, PackageIndex};
use crate::page::{egg_link, PackagePage, PageFields};

/// What [`Registrar::publish`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Publication {
    Registered,
    Updated,
}

/// The argument set a tag push publishes with: package name from the
/// repository, version from the tag, descriptions and author from the
/// template metadata (empty when absent), and a `git+` link to the tag.
pub fn publish_args(ctx: &GithubContext, metadata: &Value) -> IndexResult<IndexArgs> {
    let repo_name = ctx.repo_name()?;
    let tag = ctx.tag()?;
    let text = |key: &str| {
        metadata
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let description = text("description");
    let homepage = ctx.homepage();
    let link = format!("git+{homepage}.git@{tag}");

    let mut args = IndexArgs::new();
    args.set(VERSION, tag)
        .set(NEW_VERSION, tag)
        .set(PACKAGE_NAME, repo_name)
        .set(SHORT_DESCRIPTION, description.clone())
        .set(LONG_DESCRIPTION, description)
        .set(HOMEPAGE, homepage)
        .set(LINK, link.clone())
        .set(NEW_VERSION_LINK, link)
        .set(AUTHOR, text("author"));
    Ok(args)
}

fn package_name(args: &IndexArgs) -> IndexResult<PackageName> {
    Ok(PackageName::new(args.require(PACKAGE_NAME)?)?)
}

/// Index operations over one [`SiteLayout`].
#[derive(Debug, Clone)]
pub struct Registrar {
    layout: SiteLayout,
}

impl Registrar {
    pub fn new(layout: SiteLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &SiteLayout {
        &self.layout
    }

    pub fn load_index(&self) -> IndexResult<PackageIndex> {
        PackageIndex::load(&self.layout.index_file())
    }

    /// Whether `name` has an anchor in the index.
    pub fn package_exists(&self, name: &PackageName) -> IndexResult<bool> {
        Ok(self.load_index()?.contains(name))
    }

    /// Add a package to the index and create its page.
    pub fn register(&self, args: &IndexArgs) -> IndexResult<PackageEntry> {
        args.check(&REGISTER_KEYS)?;
        let name = package_name(args)?;
        let version = args.require(VERSION)?;

        let index_path = self.layout.index_file();
        let mut index = PackageIndex::load(&index_path)?;
        if index.contains(&name) {
            return Err(IndexError::AlreadyRegistered {
                package: name.normalized().to_string(),
            });
        }
        let template = read_text(&self.layout.page_template())?;

        let entry = index.append(&name, version, args.require(SHORT_DESCRIPTION)?)?;
        index.save(&index_path)?;

        let link = egg_link(args.require(LINK)?, name.normalized(), version);
        let page = PackagePage::render(
            &template,
            &PageFields {
                package_name: name.display_name(),
                version,
                link: &link,
                homepage: args.require(HOMEPAGE)?,
                author: args.require(AUTHOR)?,
                long_description: args.require(LONG_DESCRIPTION)?,
            },
        );
        let dir = self.layout.package_dir(name.normalized());
        std::fs::create_dir_all(&dir).map_err(|source| IndexError::Io {
            path: dir.clone(),
            source,
        })?;
        write_text(&self.layout.package_page(name.normalized()), &page)?;

        tracing::info!(package = %name.normalized(), version, "registered package");
        Ok(entry)
    }

    /// Publish a new version of an indexed package.
    pub fn update(&self, args: &IndexArgs) -> IndexResult<()> {
        args.check(&UPDATE_KEYS)?;
        let name = package_name(args)?;
        let version = args.require(NEW_VERSION)?;

        let index_path = self.layout.index_file();
        let mut index = PackageIndex::load(&index_path)?;
        if !index.contains(&name) {
            return Err(IndexError::NotRegistered {
                package: name.normalized().to_string(),
            });
        }
        let mut page = PackagePage::load(&self.layout.package_page(name.normalized()))?;

        let href = egg_link(args.require(NEW_VERSION_LINK)?, name.normalized(), version);
        index.set_version(&name, version)?;
        page.append_version(&href)?;
        page.set_latest_version(version)?;

        index.save(&index_path)?;
        page.save()?;

        tracing::info!(package = %name.normalized(), version, "updated package");
        Ok(())
    }

    /// Remove a package's directory and its index anchor.
    pub fn delete(&self, args: &IndexArgs) -> IndexResult<PackageEntry> {
        args.check(&DELETE_KEYS)?;
        let name = package_name(args)?;

        let index_path = self.layout.index_file();
        let mut index = PackageIndex::load(&index_path)?;
        if !index.contains(&name) {
            return Err(IndexError::NotRegistered {
                package: name.normalized().to_string(),
            });
        }

        let dir = self.layout.package_dir(name.normalized());
        remove_package_dir(&dir)?;

        let entry = index.remove(&name)?;
        index.save(&index_path)?;

        tracing::info!(package = %name.normalized(), "deleted package");
        Ok(entry)
    }

    /// The argument set for the release in `ctx`, with descriptions and
    /// author taken from the template metadata.
    pub fn release_args(&self, ctx: &GithubContext) -> IndexResult<IndexArgs> {
        let metadata = read_json(&self.layout.template_metadata())?;
        publish_args(ctx, &metadata)
    }

    /// Register the package of `args`, or update it when already indexed.
    pub fn publish_release(&self, args: &IndexArgs) -> IndexResult<Publication> {
        let name = package_name(args)?;
        if self.package_exists(&name)? {
            tracing::debug!(package = %name.normalized(), "package indexed, publishing as update");
            self.update(args)?;
            Ok(Publication::Updated)
        } else {
            tracing::debug!(package = %name.normalized(), "package not indexed, registering");
            self.register(args)?;
            Ok(Publication::Registered)
        }
    }

    /// Register or update the package released by `ctx`.
    pub fn publish(&self, ctx: &GithubContext) -> IndexResult<(Publication, IndexArgs)> {
        let args = self.release_args(ctx)?;
        let publication = self.publish_release(&args)?;
        Ok((publication, args))
    }
}

fn remove_package_dir(dir: &Path) -> IndexResult<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %dir.display(), "package directory already absent");
            Ok(())
        }
        Err(source) => Err(IndexError::Io {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn publish_args_follow_context_and_metadata() {
        let ctx = GithubContext::new("acme/acme-tool", "refs/tags/1.2.3").unwrap();
        let args = publish_args(&ctx, &json!({"description": "Tools", "author": "ACME"})).unwrap();
        assert_eq!(args.get(PACKAGE_NAME), Some("acme-tool"));
        assert_eq!(args.get(VERSION), Some("1.2.3"));
        assert_eq!(args.get(NEW_VERSION), Some("1.2.3"));
        assert_eq!(args.get(SHORT_DESCRIPTION), Some("Tools"));
        assert_eq!(args.get(LONG_DESCRIPTION), Some("Tools"));
        assert_eq!(args.get(HOMEPAGE), Some("https://github.com/acme/acme-tool"));
        assert_eq!(args.get(LINK), Some("git+https://github.com/acme/acme-tool.git@1.2.3"));
        assert_eq!(args.get(NEW_VERSION_LINK), args.get(LINK));
        assert_eq!(args.get(AUTHOR), Some("ACME"));
    }

    #[test]
    fn publish_args_default_to_empty_text() {
        let ctx = GithubContext::new("acme/acme-tool", "refs/tags/1.2.3").unwrap();
        let args = publish_args(&ctx, &json!({"command": "init"})).unwrap();
        assert_eq!(args.get(SHORT_DESCRIPTION), Some(""));
        assert_eq!(args.get(AUTHOR), Some(""));
        assert!(matches!(
            args.check(&REGISTER_KEYS),
            Err(IndexError::EmptyArgument { name }) if name == AUTHOR
        ));
    }
}
