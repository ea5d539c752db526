//! What the observer marks for pre-commit validation.

use strand_tests::prelude::*;

mod keys {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_keyless_thing_is_not_tracked() {
        let mut h = Harness::new();
        let person = h.entity("person");
        let age = h.attribute("age", 30i64);

        h.observer().entity_created(&person, false).unwrap();
        h.observer().attribute_created(&age, &age.value, false).unwrap();

        assert_eq!(h.context.transaction_cache().modified_things().count(), 0);
    }

    #[test]
    fn test_keyed_thing_is_tracked() {
        // GIVEN user declares email as a key
        let mut h = Harness::new();
        let user = h.entity("user");

        // WHEN created, asserted or inferred
        h.observer().entity_created(&user, false).unwrap();
        let inferred = h.entity("user").inferred();
        h.observer().entity_created(&inferred, true).unwrap();

        // THEN both are validation-pending
        let cache = h.context.transaction_cache();
        assert!(cache.is_tracked_for_validation(Thing::from(user)));
        assert!(cache.is_tracked_for_validation(Thing::from(inferred)));
    }

    #[test]
    fn test_key_relation_marks_key_index() {
        // GIVEN a user and its email
        let mut h = Harness::new();
        let user = h.entity("user");
        let email = h.attribute("email", "alice@example.com");
        let key = h.key_relation(&user, &email);

        // WHEN the implicit key relation is created
        h.observer().has_attribute_relation_created(&key, false).unwrap();

        // THEN the index uses the attribute type, not the implicit label
        let indices: Vec<_> = h
            .context
            .transaction_cache()
            .modified_key_indices()
            .iter()
            .cloned()
            .collect();
        assert_eq!(indices, vec!["ATTRIBUTE-email-alice@example.com".to_string()]);
        assert_eq!(h.delta("@key-email"), 1);
    }

    #[test]
    fn test_key_relation_without_attribute_player() {
        let mut h = Harness::new();
        let user = h.entity("user");
        let key = h.relation("@key-email", &[("@key-email-owner", Thing::from(user))]);

        h.observer().has_attribute_relation_created(&key, false).unwrap();

        assert!(h.context.transaction_cache().modified_key_indices().is_empty());
    }
}

mod abstract_toggles {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tracked_after(toggles: &[bool]) -> bool {
        let mut h = Harness::new();
        let person = h.ty("person");
        for is_abstract in toggles {
            h.observer().concept_set_abstract(&person, *is_abstract).unwrap();
        }
        h.context.transaction_cache().is_tracked_for_validation(person)
    }

    #[test]
    fn test_last_toggle_wins() {
        assert!(tracked_after(&[false]));
        assert!(!tracked_after(&[true]));
        assert!(!tracked_after(&[false, true]));
        assert!(tracked_after(&[true, false]));
        assert!(tracked_after(&[false, false, true, false]));
        assert!(!tracked_after(&[true, true, false, true]));
    }

    #[test]
    fn test_untracked_type_made_abstract() {
        assert!(!tracked_after(&[true, true]));
    }
}

mod castings {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_role_unrelated_with_no_castings() {
        let mut h = Harness::new();
        let friendship = h.schema.get_relation_type("friendship").unwrap();
        let friend = h.schema.get_role("friend").unwrap().clone();

        h.observer()
            .relation_role_unrelated(&friendship, &friend, &[])
            .unwrap();

        let cache = h.context.transaction_cache();
        assert_eq!(cache.validation_targets().count(), 2);
        assert_eq!(cache.modified_castings().count(), 0);
    }

    #[test]
    fn test_role_unrelated_tracks_castings() {
        // GIVEN a friendship with two friends
        let mut h = Harness::new();
        let alice = h.entity("person");
        let bob = h.entity("person");
        let friendship = h.relation(
            "friendship",
            &[("friend", Thing::from(alice)), ("friend", Thing::from(bob))],
        );
        let castings = h.graph.relation_castings(&friendship).unwrap();
        let relation_type = h.schema.get_relation_type("friendship").unwrap();
        let friend = h.schema.get_role("friend").unwrap().clone();

        // WHEN
        h.observer()
            .relation_role_unrelated(&relation_type, &friend, &castings)
            .unwrap();

        // THEN
        let cache = h.context.transaction_cache();
        assert_eq!(cache.modified_castings().count(), 2);
        assert!(cache.is_tracked_for_validation(friend));
        assert!(cache.is_tracked_for_validation(relation_type.into_type()));
    }

    #[test]
    fn test_role_player_created_then_deleted() {
        let mut h = Harness::new();
        let alice = h.entity("person");
        let friendship = h.relation("friendship", &[]);
        let casting = h.graph.add_role_player(friendship.id, "friend", alice.id).unwrap();

        h.observer().role_player_created(&casting).unwrap();
        assert!(h
            .context
            .transaction_cache()
            .is_tracked_for_validation(casting.clone()));

        h.observer().casting_deleted(&casting).unwrap();
        assert!(!h.context.transaction_cache().is_tracked_for_validation(casting));
    }
}

mod instance_walks {
    use super::*;
    use pretty_assertions::assert_eq;

    fn castings_of(h: &Harness) -> Vec<Casting> {
        let mut castings: Vec<_> = h
            .context
            .transaction_cache()
            .modified_castings()
            .cloned()
            .collect();
        castings.sort_by_key(|casting| (casting.relation, casting.player));
        castings
    }

    #[test]
    fn test_track_relation_instances_role_players() {
        // GIVEN two friendships, one edge-backed
        let mut h = Harness::new();
        let alice = h.entity("person");
        let bob = h.entity("person");
        let reified = h.relation(
            "friendship",
            &[("friend", Thing::from(alice.clone())), ("friend", Thing::from(bob.clone()))],
        );
        let edge_backed = Relation::new(h.graph.alloc_id(), h.ty("friendship"))
            .edge_backed()
            .with_role_player("friend", alice);
        h.graph.insert(edge_backed);
        let friendship = h.schema.get_relation_type("friendship").unwrap();

        // WHEN
        h.context
            .observer()
            .track_relation_instances_role_players(&friendship, &h.graph)
            .unwrap();

        // THEN only the reified relation's castings are tracked
        let castings = castings_of(&h);
        assert_eq!(castings.len(), 2);
        assert!(castings.iter().all(|casting| casting.relation == reified.id));
    }

    #[test]
    fn test_track_entity_instances_roles_played() {
        // GIVEN alice employed and in a friendship, bob in nothing
        let mut h = Harness::new();
        let alice = h.entity("person");
        let _bob = h.entity("person");
        let acme = h.entity("user");
        let employment = h.relation(
            "employment",
            &[("employee", Thing::from(alice.clone())), ("employer", Thing::from(acme))],
        );
        let friendship = h.relation("friendship", &[("friend", Thing::from(alice.clone()))]);
        let person = h.schema.get_entity_type("person").unwrap();

        // WHEN
        h.context
            .observer()
            .track_entity_instances_roles_played(&person, &h.graph)
            .unwrap();

        // THEN alice's two castings, not acme's
        assert_eq!(
            castings_of(&h),
            vec![
                Casting::new(employment.id, "employment", "employee", alice.id),
                Casting::new(friendship.id, "friendship", "friend", alice.id),
            ]
        );
    }

    #[test]
    fn test_track_attribute_instances_roles_played() {
        let mut h = Harness::new();
        let alice = h.entity("person");
        let age = h.attribute("age", 30i64);
        let has = h.relation(
            "@has-age",
            &[("@has-age-owner", Thing::from(alice)), ("@has-age-value", Thing::from(age.clone()))],
        );
        let age_type = h.schema.get_attribute_type("age").unwrap();

        h.context
            .observer()
            .track_attribute_instances_roles_played(&age_type, &h.graph)
            .unwrap();

        assert_eq!(
            castings_of(&h),
            vec![Casting::new(has.id, "@has-age", "@has-age-value", age.id)]
        );
    }

    #[test]
    fn test_type_without_instances_tracks_nothing() {
        let mut h = Harness::new();
        let employment = h.schema.get_relation_type("employment").unwrap();

        h.context
            .observer()
            .track_relation_instances_role_players(&employment, &h.graph)
            .unwrap();

        assert!(h.context.transaction_cache().is_empty());
    }

    #[test]
    fn test_unreadable_graph_propagates() {
        let mut h = Harness::new();
        let person = h.schema.get_entity_type("person").unwrap();

        let result = h
            .observer()
            .track_entity_instances_roles_played(&person, &UnreadableGraph);

        assert!(matches!(
            result,
            Err(ObserverError::Graph(GraphError::Unavailable(_)))
        ));
    }
}
