//! Tests for path resolution against registered shapes

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::sync::Arc;

use super::{NameMatching, PropertyResolver, is_class_placeholder};
use crate::metadata::{Accessor, MapKey, PropertyBuilder, PropertyRef, RawKind, TypeFactory};

fn factory() -> Arc<TypeFactory> {
    let types = Arc::new(TypeFactory::new());
    types
        .register(
            RawKind::structure("Name")
                .field("first", "String")
                .field("last", "String"),
        )
        .unwrap();
    types
        .register(
            RawKind::structure("Person")
                .field("name", "Name")
                .field("userName", "String")
                .field("nicknames", "List<String>"),
        )
        .unwrap();
    types
        .register(RawKind::structure("PersonDto").field("names", "Map<String, String>"))
        .unwrap();
    types
        .register(RawKind::enumeration("Level", ["GOLD", "SILVER"]))
        .unwrap();
    types
        .register(RawKind::structure("Ledger").field("byLevel", "Map<Level, i64>"))
        .unwrap();
    types
}

fn resolver(matching: NameMatching) -> PropertyResolver { PropertyResolver::new(factory(), matching) }

#[test]
fn test_struct_properties_end_with_class_placeholder() {
    let resolver = resolver(NameMatching::Exact);
    let person = resolver.types().value_of("Person").unwrap();

    let names = resolver.property_names(&person).unwrap();
    assert_eq!(names, ["name", "userName", "nicknames", "class"]);

    let properties = resolver.properties(&person).unwrap();
    let class = properties.last().unwrap();
    assert!(is_class_placeholder(class));
    assert!(!class.is_writable());
}

#[test]
fn test_nested_expression_resolves_hop_by_hop() {
    let resolver = resolver(NameMatching::Exact);
    let person = resolver.types().value_of("Person").unwrap();

    let resolved = resolver.resolve(&person, "name.first").unwrap();
    let PropertyRef::Nested(nested) = &resolved else {
        panic!("expected a nested property, got {resolved}");
    };
    assert_eq!(nested.expression(), "name.first");
    assert_eq!(nested.path().len(), 1);
    assert_eq!(nested.path()[0].name(), "name");
    assert_eq!(nested.tail().name(), "first");
    assert_eq!(resolved.value_type().name(), "String");
    assert_eq!(resolved.root(), &person);
}

#[test]
fn test_map_key_selectors_and_plain_names() {
    let resolver = resolver(NameMatching::Exact);
    let dto = resolver.types().value_of("PersonDto").unwrap();

    let bracket = resolver.resolve(&dto, "names['first']").unwrap();
    assert!(bracket.is_map_key());
    assert_eq!(bracket.expression(), "names['first']");
    assert_eq!(
        bracket.tail().accessor(),
        &Accessor::Key(MapKey::Str("first".into()))
    );

    let dotted = resolver.resolve(&dto, "names.first").unwrap();
    assert_eq!(dotted, bracket);

    let map = resolver.types().parse("Map<String, String>").unwrap();
    let root_key = resolver.resolve(&map, "letterGrade").unwrap();
    assert!(root_key.is_map_key());
    assert_eq!(root_key.name(), "letterGrade");
}

#[test]
fn test_list_index_and_enum_constant_selectors() {
    let resolver = resolver(NameMatching::Exact);
    let person = resolver.types().value_of("Person").unwrap();
    let ledger = resolver.types().value_of("Ledger").unwrap();

    let element = resolver.resolve(&person, "nicknames[1]").unwrap();
    assert!(element.is_list_element());
    assert_eq!(element.value_type().name(), "String");

    let gold = resolver.resolve(&ledger, "byLevel[GOLD]").unwrap();
    assert_eq!(gold.value_type().name(), "i64");
    assert!(resolver.resolve(&ledger, "byLevel[BRONZE]").is_err());
}

#[test]
fn test_unresolvable_expressions_are_configuration_errors() {
    let resolver = resolver(NameMatching::Exact);
    let person = resolver.types().value_of("Person").unwrap();

    for expression in ["nmae.first", "name.middle", "name[0]", "nicknames[-1]", "name..first"] {
        let error = resolver.resolve(&person, expression).unwrap_err();
        assert!(
            error.current_context().is_configuration(),
            "{expression}: {error:?}"
        );
    }
    let message = resolver
        .resolve(&person, "nmae.first")
        .unwrap_err()
        .current_context()
        .to_string();
    assert!(message.contains("Person"));
    assert!(message.contains("nmae.first"));
}

#[test]
fn test_case_insensitive_policy_substitutes_canonical_names() {
    let exact = resolver(NameMatching::Exact);
    let insensitive = resolver(NameMatching::CaseInsensitive);
    let person = exact.types().value_of("Person").unwrap();

    assert!(exact.resolve(&person, "USERNAME").is_err());
    let resolved = insensitive.resolve(&person, "USERNAME").unwrap();
    assert_eq!(resolved.expression(), "userName");

    let nested = insensitive.resolve(&person, "Name.First").unwrap();
    assert_eq!(nested.expression(), "name.first");
}

#[test]
fn test_builder_matches_direct_resolution() {
    let resolver = resolver(NameMatching::Exact);
    let person = resolver.types().value_of("Person").unwrap();
    let dto = resolver.types().value_of("PersonDto").unwrap();

    let built = PropertyBuilder::new(person.clone())
        .property("name")
        .property("first")
        .build(&resolver)
        .unwrap();
    assert_eq!(built, resolver.resolve(&person, "name.first").unwrap());

    let from_nested = PropertyBuilder::new(dto.clone())
        .property("names['first']")
        .build(&resolver)
        .unwrap();
    let incremental = PropertyBuilder::new(dto.clone())
        .property("names")
        .property("['first']")
        .build(&resolver)
        .unwrap();
    assert_eq!(from_nested, incremental);
    assert_eq!(incremental.hops().len(), 2);

    assert!(PropertyBuilder::new(dto).build(&resolver).is_err());
}

#[test]
fn test_concurrent_resolution_agrees() {
    let resolver = Arc::new(resolver(NameMatching::CaseInsensitive));
    let person = resolver.types().value_of("Person").unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let resolver = Arc::clone(&resolver);
            let person = person.clone();
            std::thread::spawn(move || resolver.resolve(&person, "name.last").unwrap())
        })
        .collect();
    let results: Vec<PropertyRef> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(results.iter().all(|r| r == &results[0]));
}
