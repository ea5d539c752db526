//! Properties that hold over sequences of lifecycle events.

use strand_tests::prelude::*;

mod statistics {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_net_delta_is_creations_minus_deletions() {
        for (created, deleted) in [(0usize, 0usize), (3, 1), (5, 5), (2, 0)] {
            // GIVEN `created` people
            let mut h = Harness::new();
            let people: Vec<_> = (0..created).map(|_| h.entity("person")).collect();
            for person in &people {
                h.observer().entity_created(person, false).unwrap();
            }

            // WHEN `deleted` of them are deleted
            for person in people.iter().take(deleted) {
                h.observer()
                    .thing_deleted(&Thing::from(person.clone()))
                    .unwrap();
            }

            // THEN
            assert_eq!(h.delta("person"), created as i64 - deleted as i64);
        }
    }

    #[test]
    fn test_deletions_without_creations_go_negative() {
        let mut h = Harness::new();
        let alice = h.entity("person");
        let bob = h.entity("person");

        h.observer().thing_deleted(&Thing::from(alice)).unwrap();
        h.observer().thing_deleted(&Thing::from(bob)).unwrap();

        assert_eq!(h.delta("person"), -2);
    }

    #[test]
    fn test_committed_delta_reaches_keyspace_totals() {
        // GIVEN two people and one age created, one person deleted
        let mut h = Harness::new();
        let alice = h.entity("person");
        let bob = h.entity("person");
        let age = h.attribute("age", 41i64);
        h.observer().entity_created(&alice, false).unwrap();
        h.observer().entity_created(&bob, false).unwrap();
        h.observer().attribute_created(&age, &age.value, false).unwrap();
        h.observer().thing_deleted(&Thing::from(bob)).unwrap();

        // WHEN the delta is committed
        let totals = KeyspaceStatistics::new();
        let (_, _, delta) = h.context.into_parts();
        totals.commit(&delta);

        // THEN
        assert_eq!(totals.count(&Label::from("person")), 1);
        assert_eq!(totals.count(&Label::from("age")), 1);
        assert_eq!(totals.count(&Label::from("friendship")), 0);
    }
}

mod answer_cache {
    use super::*;
    use pretty_assertions::assert_eq;

    fn insertions(h: &Harness) -> usize {
        h.log.count(|call| *call == Call::AckInsertion)
    }

    #[test]
    fn test_one_insertion_ack_per_asserted_creation() {
        let mut h = Harness::new();
        let person = h.entity("person");
        let age = h.attribute("age", 30i64);
        let friendship = h.relation("friendship", &[("friend", Thing::from(person.clone()))]);

        h.observer().entity_created(&person, false).unwrap();
        h.observer().attribute_created(&age, &age.value, false).unwrap();
        h.observer().relation_created(&friendship, false).unwrap();

        assert_eq!(insertions(&h), 3);
    }

    #[test]
    fn test_no_insertion_ack_for_inferred_creation() {
        let mut h = Harness::new();
        let person = h.entity("person").inferred();
        let age = h.attribute("age", 30i64).inferred();

        h.observer().entity_created(&person, true).unwrap();
        h.observer().attribute_created(&age, &age.value, true).unwrap();

        assert_eq!(insertions(&h), 0);
        assert_eq!(h.context.transaction_cache().inferred_instances().count(), 2);
    }

    #[test]
    fn test_one_deletion_ack_per_thing_deletion() {
        let mut h = Harness::new();
        let person = h.entity("person");
        let age = h.attribute("age", 30i64);
        let friendship = h.relation("friendship", &[("friend", Thing::from(person.clone()))]);

        for thing in [Thing::from(person), Thing::from(age), Thing::from(friendship)] {
            h.observer().thing_deleted(&thing).unwrap();
        }

        assert_eq!(
            h.log.count(|call| matches!(call, Call::AckDeletion(_))),
            3
        );
        assert_eq!(
            h.log.count(|call| *call == Call::AckDeletion(Label::from("friendship"))),
            1
        );
    }
}

mod rule_cache {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_every_schema_deletion_clears_once() {
        let mut h = Harness::new();
        let concepts = [
            SchemaConcept::from(h.ty("person")),
            SchemaConcept::from(h.schema.get_role("friend").unwrap().clone()),
            SchemaConcept::from(h.schema.get_rule("transitive-friendship").unwrap().clone()),
        ];

        for (n, concept) in concepts.iter().enumerate() {
            h.observer().schema_concept_deleted(concept).unwrap();
            assert_eq!(h.log.count(|call| *call == Call::ClearRules), n + 1);
        }
    }

    #[test]
    fn test_creation_acks_type_instance_first() {
        let mut h = Harness::new();
        let user = h.entity("user");

        h.observer().entity_created(&user, true).unwrap();

        assert_eq!(h.calls().first(), Some(&Call::AckTypeInstance(Label::from("user"))));
    }
}

mod dedup_acks {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_insert_and_delete_agree_on_index() {
        for value in [Value::from(30i64), Value::from(2.5f64), Value::from(true), Value::from("x y")] {
            let mut h = Harness::new();
            let label = if value.is_string() { "name" } else { "age" };
            let attribute = h.attribute(label, value.clone());

            h.observer()
                .attribute_created(&attribute, &attribute.value, false)
                .unwrap();
            h.observer()
                .thing_deleted(&Thing::from(attribute.clone()))
                .unwrap();

            let indices: Vec<_> = h
                .calls()
                .into_iter()
                .filter_map(|call| match call {
                    Call::AckInsert { index, .. } | Call::AckDelete { index, .. } => Some(index),
                    _ => None,
                })
                .collect();
            assert_eq!(indices.len(), 2);
            assert_eq!(indices[0], indices[1]);
            assert_eq!(indices[0], attribute_index(&attribute.ty.label, &value));
        }
    }

    #[test]
    fn test_non_attribute_deletion_never_acks_dedup() {
        let mut h = Harness::new();
        let person = h.entity("person");

        h.observer().thing_deleted(&Thing::from(person)).unwrap();

        assert_eq!(
            h.log
                .count(|call| matches!(call, Call::AckInsert { .. } | Call::AckDelete { .. })),
            0
        );
    }
}
