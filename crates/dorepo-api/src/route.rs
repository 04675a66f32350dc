//! Resolution of a method and path into a closed set of routes.
//!
//! Matching is by prefix, most specific first. Paths the protocol names but
//! this server does not implement resolve to [`Route::Reserved`]; anything
//! else resolves to [`Route::Unknown`]. Both answer 404. Identifier
//! segments are percent-decoded before they leave this module.

use std::fmt;

use axum::http::Method;

use dorepo_entity::FileKey;
use dorepo_entity::file::key::decode_segment;

const ENTITY: &str = "/entity";
const ENTITY_PREFIX: &str = "/entity/";
const REPRESENTATION_PREFIX: &str = "/representation/";
const FILE_PREFIX: &str = "/file/";

/// Protocol paths that are recognised but not served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservedRoute {
    /// POST `/entity-async`
    IngestAsync,
    /// POST `/entity-list`
    IngestList,
    /// GET `/metadata/`
    Metadata,
    /// GET `/entity-version-list/`
    EntityVersionList,
    /// GET `/sru/entities`
    SearchEntities,
    /// GET `/sru/representations`
    SearchRepresentations,
    /// GET `/bitstream/`
    Bitstream,
    /// GET `/lifecycle/`
    Lifecycle,
    /// PUT `/entity/`
    UpdateEntity,
    /// PUT `/representation/`
    UpdateRepresentation,
    /// PUT `/metadata/`
    UpdateMetadata,
    /// Any DELETE
    Delete,
}

impl ReservedRoute {
    /// Short name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IngestAsync => "entity-async",
            Self::IngestList => "entity-list",
            Self::Metadata => "metadata",
            Self::EntityVersionList => "entity-version-list",
            Self::SearchEntities => "sru-entities",
            Self::SearchRepresentations => "sru-representations",
            Self::Bitstream => "bitstream",
            Self::Lifecycle => "lifecycle",
            Self::UpdateEntity => "update-entity",
            Self::UpdateRepresentation => "update-representation",
            Self::UpdateMetadata => "update-metadata",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for ReservedRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved request target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// POST `/entity`
    IngestEntity,
    /// GET `/entity/{id}`
    GetEntity {
        /// Entity identifier
        id: String,
    },
    /// GET `/representation/{entityId}/{repId}`
    GetRepresentation {
        /// Entity identifier
        entity_id: String,
        /// Representation identifier
        representation_id: String,
    },
    /// GET `/file/{entityId}/{repId}/{fileId}`
    GetFile(FileKey),
    /// Recognised, not served
    Reserved(ReservedRoute),
    /// Nothing matched
    Unknown,
}

impl Route {
    /// Resolve `method` and `path` to a route.
    pub fn resolve(method: &Method, path: &str) -> Self {
        match *method {
            Method::GET => Self::resolve_get(path),
            Method::POST => Self::resolve_post(path),
            Method::PUT => Self::resolve_put(path),
            Method::DELETE => Self::Reserved(ReservedRoute::Delete),
            _ => Self::Unknown,
        }
    }

    fn resolve_get(path: &str) -> Self {
        if path.starts_with("/entity-version-list/") {
            return Self::Reserved(ReservedRoute::EntityVersionList);
        }
        if let Some(id) = path.strip_prefix(ENTITY_PREFIX) {
            return decode_segment(id).map_or(Self::Unknown, |id| Self::GetEntity { id });
        }
        if let Some(rest) = path.strip_prefix(REPRESENTATION_PREFIX) {
            let ids = rest.split_once('/').and_then(|(entity_id, representation_id)| {
                Some((decode_segment(entity_id)?, decode_segment(representation_id)?))
            });
            return ids.map_or(Self::Unknown, |(entity_id, representation_id)| {
                Self::GetRepresentation {
                    entity_id,
                    representation_id,
                }
            });
        }
        if let Some(rest) = path.strip_prefix(FILE_PREFIX) {
            return FileKey::parse(rest).map_or(Self::Unknown, Self::GetFile);
        }

        let reserved = [
            ("/metadata/", ReservedRoute::Metadata),
            ("/sru/entities", ReservedRoute::SearchEntities),
            ("/sru/representations", ReservedRoute::SearchRepresentations),
            ("/bitstream/", ReservedRoute::Bitstream),
            ("/lifecycle/", ReservedRoute::Lifecycle),
        ];
        reserved
            .iter()
            .find(|(prefix, _)| path.starts_with(prefix))
            .map_or(Self::Unknown, |(_, route)| Self::Reserved(*route))
    }

    fn resolve_post(path: &str) -> Self {
        if path == ENTITY {
            Self::IngestEntity
        } else if path.starts_with("/entity-async") {
            Self::Reserved(ReservedRoute::IngestAsync)
        } else if path.starts_with("/entity-list") {
            Self::Reserved(ReservedRoute::IngestList)
        } else {
            Self::Unknown
        }
    }

    fn resolve_put(path: &str) -> Self {
        if path.starts_with(ENTITY_PREFIX) {
            Self::Reserved(ReservedRoute::UpdateEntity)
        } else if path.starts_with(REPRESENTATION_PREFIX) {
            Self::Reserved(ReservedRoute::UpdateRepresentation)
        } else if path.starts_with("/metadata/") {
            Self::Reserved(ReservedRoute::UpdateMetadata)
        } else {
            Self::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_implemented_routes() {
        assert_eq!(Route::resolve(&Method::POST, "/entity"), Route::IngestEntity);
        assert_eq!(
            Route::resolve(&Method::GET, "/entity/abc"),
            Route::GetEntity { id: "abc".into() }
        );
        assert_eq!(
            Route::resolve(&Method::GET, "/representation/abc/original"),
            Route::GetRepresentation {
                entity_id: "abc".into(),
                representation_id: "original".into(),
            }
        );
        assert_eq!(
            Route::resolve(&Method::GET, "/file/abc/original/f1"),
            Route::GetFile(FileKey::new("abc", "original", "f1"))
        );
    }

    #[test]
    fn test_identifiers_are_percent_decoded() {
        assert_eq!(
            Route::resolve(&Method::GET, "/entity/a%20b"),
            Route::GetEntity { id: "a b".into() }
        );
        assert_eq!(
            Route::resolve(&Method::GET, "/representation/caf%C3%A9/r%231"),
            Route::GetRepresentation {
                entity_id: "café".into(),
                representation_id: "r#1".into(),
            }
        );
        assert_eq!(
            Route::resolve(&Method::GET, "/file/a%20b/r/50%25"),
            Route::GetFile(FileKey::new("a b", "r", "50%"))
        );
        assert_eq!(Route::resolve(&Method::GET, "/entity/a%2Fb"), Route::Unknown);
        assert_eq!(Route::resolve(&Method::GET, "/representation/a/%2E%2E"), Route::Unknown);
    }

    #[test]
    fn test_reserved_routes() {
        let cases = [
            (Method::POST, "/entity-async", ReservedRoute::IngestAsync),
            (Method::POST, "/entity-list", ReservedRoute::IngestList),
            (Method::GET, "/metadata/abc", ReservedRoute::Metadata),
            (Method::GET, "/entity-version-list/abc", ReservedRoute::EntityVersionList),
            (Method::GET, "/sru/entities?query=x", ReservedRoute::SearchEntities),
            (Method::GET, "/sru/representations", ReservedRoute::SearchRepresentations),
            (Method::GET, "/bitstream/abc", ReservedRoute::Bitstream),
            (Method::GET, "/lifecycle/abc", ReservedRoute::Lifecycle),
            (Method::PUT, "/entity/abc", ReservedRoute::UpdateEntity),
            (Method::PUT, "/representation/abc/r", ReservedRoute::UpdateRepresentation),
            (Method::PUT, "/metadata/abc", ReservedRoute::UpdateMetadata),
            (Method::DELETE, "/entity/abc", ReservedRoute::Delete),
            (Method::DELETE, "/anything", ReservedRoute::Delete),
        ];
        for (method, path, expected) in cases {
            assert_eq!(
                Route::resolve(&method, path),
                Route::Reserved(expected),
                "{method} {path}"
            );
        }
    }

    #[test]
    fn test_unknown_routes() {
        let cases = [
            (Method::GET, "/"),
            (Method::GET, "/entity"),
            (Method::GET, "/entity/"),
            (Method::GET, "/entity/a/b"),
            (Method::GET, "/entity/.."),
            (Method::GET, "/representation/abc"),
            (Method::GET, "/representation/abc/r/extra"),
            (Method::GET, "/file/abc/r"),
            (Method::GET, "/file/abc/../f"),
            (Method::POST, "/entity/abc"),
            (Method::POST, "/other"),
            (Method::PUT, "/file/a/b/c"),
            (Method::PATCH, "/entity/abc"),
            (Method::HEAD, "/entity/abc"),
        ];
        for (method, path) in cases {
            assert_eq!(Route::resolve(&method, path), Route::Unknown, "{method} {path}");
        }
    }
}
