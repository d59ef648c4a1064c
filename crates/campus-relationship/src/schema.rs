//! Schema-addressed relate, unrelate and queries
//!
//! Lets callers write `MEMBERSHIP.link(.., [("member", p), ("group", g)], ..)`
//! instead of spelling out role URIs.

use crate::query::{related_objects, relationships, RelatedObjects, RelationshipInfo};
use crate::{RelationshipEngine, RelationshipError};
use campus_domain::{HasRelationshipLinks, LinkStore, ObjectRef, RelationshipSchema};
use std::fmt::Display;

/// Relationship operations addressed by schema role names
pub trait SchemaExt {
    /// Establish the relationship between the named parties
    fn link<S>(
        &self,
        engine: &mut RelationshipEngine,
        store: &mut S,
        parties: [(&str, ObjectRef); 2],
        extra_info: Option<String>,
    ) -> Result<(), RelationshipError>
    where
        S: LinkStore,
        S::Error: Display;

    /// Break the relationship between the named parties
    fn unlink<S>(
        &self,
        engine: &mut RelationshipEngine,
        store: &mut S,
        parties: [(&str, ObjectRef); 2],
    ) -> Result<(), RelationshipError>
    where
        S: LinkStore,
        S::Error: Display;

    /// Objects at the other end from the named party
    ///
    /// `MEMBERSHIP.query(&store, "group", &g)` yields the members of `g`.
    fn query<S>(&self, store: &S, name: &str, obj: &impl HasRelationshipLinks) -> Result<RelatedObjects, RelationshipError>
    where
        S: LinkStore,
        S::Error: Display;

    /// Relationships of this type held by the named party
    fn relationships<S>(
        &self,
        store: &S,
        name: &str,
        obj: &impl HasRelationshipLinks,
    ) -> Result<Vec<RelationshipInfo>, RelationshipError>
    where
        S: LinkStore,
        S::Error: Display;
}

impl SchemaExt for RelationshipSchema {
    fn link<S>(
        &self,
        engine: &mut RelationshipEngine,
        store: &mut S,
        parties: [(&str, ObjectRef); 2],
        extra_info: Option<String>,
    ) -> Result<(), RelationshipError>
    where
        S: LinkStore,
        S::Error: Display,
    {
        let (first, second) = self.bind(parties)?;
        engine.relate(store, self.rel_type(), first, second, extra_info)
    }

    fn unlink<S>(
        &self,
        engine: &mut RelationshipEngine,
        store: &mut S,
        parties: [(&str, ObjectRef); 2],
    ) -> Result<(), RelationshipError>
    where
        S: LinkStore,
        S::Error: Display,
    {
        let (first, second) = self.bind(parties)?;
        engine.unrelate(store, self.rel_type(), first, second)
    }

    fn query<S>(&self, store: &S, name: &str, obj: &impl HasRelationshipLinks) -> Result<RelatedObjects, RelationshipError>
    where
        S: LinkStore,
        S::Error: Display,
    {
        let role = self.other_role(name)?;
        related_objects(store, obj, role, Some(self.rel_type()))
    }

    fn relationships<S>(
        &self,
        store: &S,
        name: &str,
        obj: &impl HasRelationshipLinks,
    ) -> Result<Vec<RelationshipInfo>, RelationshipError>
    where
        S: LinkStore,
        S::Error: Display,
    {
        let role = self.other_role(name)?;
        relationships(store, obj, role, Some(self.rel_type()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_domain::{schema, Group, Person, Registry, SchemaError};
    use campus_store::MemoryStore;
    use std::sync::Arc;

    fn engine() -> RelationshipEngine {
        RelationshipEngine::default_config(Arc::new(Registry::standard().unwrap()))
    }

    #[test]
    fn test_link_query_unlink() {
        let mut engine = engine();
        let mut store = MemoryStore::new();
        let (p, g) = (Person::new("Ona"), Group::new("Choir"));

        schema::MEMBERSHIP
            .link(
                &mut engine,
                &mut store,
                [("group", g.object_ref()), ("member", p.object_ref())],
                None,
            )
            .unwrap();

        let members = schema::MEMBERSHIP.query(&store, "group", &g).unwrap();
        assert_eq!(members.into_vec(), vec![p.object_ref()]);
        let groups = schema::MEMBERSHIP.query(&store, "member", &p).unwrap();
        assert!(groups.contains(g.id));

        let infos = schema::MEMBERSHIP.relationships(&store, "member", &p).unwrap();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].target, g.object_ref());

        schema::MEMBERSHIP
            .unlink(&mut engine, &mut store, [("member", p.object_ref()), ("group", g.object_ref())])
            .unwrap();
        assert!(schema::MEMBERSHIP.query(&store, "group", &g).unwrap().is_empty());
    }

    #[test]
    fn test_bad_role_names() {
        let mut engine = engine();
        let mut store = MemoryStore::new();
        let (p, g) = (Person::new("Ona"), Group::new("Choir"));

        let err = schema::MEMBERSHIP
            .link(&mut engine, &mut store, [("member", p.object_ref()), ("leader", g.object_ref())], None)
            .unwrap_err();
        assert!(matches!(err, RelationshipError::Schema(SchemaError::UnknownRole(_))));

        let err = schema::MEMBERSHIP.query(&store, "asset", &g).unwrap_err();
        assert!(matches!(err, RelationshipError::Schema(SchemaError::UnknownRole(_))));
        assert_eq!(store.commit_count(), 0);
    }
}
