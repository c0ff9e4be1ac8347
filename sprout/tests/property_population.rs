mod components;

use std::rc::Rc;

use sprout::{BeanDefinition, BeanError, BeanFactory, DefaultListableBeanFactory, Value};

use crate::components::{EventLog, Flags, TestBean};

#[test]
fn last_assignment_wins() {
    let mut factory = DefaultListableBeanFactory::new();
    factory
        .register_bean_definition(
            "tom",
            BeanDefinition::of::<TestBean>()
                .property("age", "1")
                .property("age", 2),
        )
        .unwrap();

    assert_eq!(factory.get_bean_of::<TestBean>("tom").unwrap().borrow().age, 2);
}

#[test]
fn literal_to_unsupported_type_fails() {
    let mut factory = DefaultListableBeanFactory::new();
    factory
        .register_bean_definition("flags", BeanDefinition::of::<Flags>().property("enabled", "true"))
        .unwrap();

    let err = factory.get_bean("flags").unwrap_err();

    assert!(matches!(
        err.root_cause(),
        BeanError::UnsupportedType { name, property, type_name }
            if name == "flags" && property == "enabled" && *type_name == "bool"
    ));
}

#[test]
fn literal_to_bean_property_is_unsupported() {
    let mut factory = DefaultListableBeanFactory::new();
    factory
        .register_bean_definition("tom", BeanDefinition::of::<TestBean>().property("spouse", "jerry"))
        .unwrap();

    let err = factory.get_bean("tom").unwrap_err();

    assert!(matches!(
        err.root_cause(),
        BeanError::UnsupportedType { name, property, .. } if name == "tom" && property == "spouse"
    ));
    assert!(!factory.contains_singleton("tom"));
}

#[test]
fn unknown_property_is_not_writable() {
    let mut factory = DefaultListableBeanFactory::new();
    factory
        .register_bean_definition("tom", BeanDefinition::of::<TestBean>().property("nickname", "tommy"))
        .unwrap();

    let err = factory.get_bean("tom").unwrap_err();

    assert!(matches!(
        err.root_cause(),
        BeanError::NotWritableProperty { property, .. } if property == "nickname"
    ));
}

#[test]
fn renamed_field_is_set_under_its_property_name() {
    let mut factory = DefaultListableBeanFactory::new();
    factory
        .register_bean_definition("tom", BeanDefinition::of::<TestBean>().property_ref("friend", "jerry"))
        .unwrap();
    factory
        .register_bean_definition("jerry", BeanDefinition::of::<TestBean>().property("name", "Jerry"))
        .unwrap();

    let tom = factory.get_bean_of::<TestBean>("tom").unwrap();
    let friend = tom.borrow().best_friend.clone().unwrap();

    assert_eq!(friend.borrow().name, "Jerry");
    assert!(tom.borrow().spouse.is_none());
}

#[test]
fn reference_of_another_type_is_a_type_mismatch() {
    let mut factory = DefaultListableBeanFactory::new();
    factory
        .register_bean_definition("tom", BeanDefinition::of::<TestBean>().property_ref("spouse", "log"))
        .unwrap();
    factory
        .register_bean_definition("log", BeanDefinition::of::<EventLog>())
        .unwrap();

    let err = factory.get_bean("tom").unwrap_err();

    assert!(matches!(
        err.root_cause(),
        BeanError::TypeMismatch { property, .. } if property == "spouse"
    ));
    assert!(factory.contains_singleton("log"));
    assert!(!factory.contains_singleton("tom"));
}

#[test]
fn inner_bean_is_never_shared() {
    let mut factory = DefaultListableBeanFactory::new();
    factory
        .register_bean_definition(
            "outer",
            BeanDefinition::of::<TestBean>()
                .singleton(false)
                .property(
                    "spouse",
                    Value::inner(BeanDefinition::of::<TestBean>().property("name", "inner")),
                ),
        )
        .unwrap();

    let first = factory.get_bean_of::<TestBean>("outer").unwrap();
    let second = factory.get_bean_of::<TestBean>("outer").unwrap();

    assert_eq!(first.borrow().spouse().borrow().name, "inner");
    assert!(!Rc::ptr_eq(&first.borrow().spouse(), &second.borrow().spouse()));
    assert_eq!(factory.singleton_count(), 0);
}

#[test]
fn inner_bean_of_a_singleton_is_not_cached() {
    let mut factory = DefaultListableBeanFactory::new();
    factory
        .register_bean_definition(
            "outer",
            BeanDefinition::of::<TestBean>().property("spouse", BeanDefinition::of::<TestBean>()),
        )
        .unwrap();

    factory.get_bean("outer").unwrap();

    assert_eq!(factory.singleton_count(), 1);
    assert_eq!(factory.bean_definition_count(), 1);
}

#[test]
fn inner_bean_failure_names_the_property() {
    let mut factory = DefaultListableBeanFactory::new();
    factory
        .register_bean_definition(
            "outer",
            BeanDefinition::of::<TestBean>().property(
                "spouse",
                BeanDefinition::of::<TestBean>().property("age", "old"),
            ),
        )
        .unwrap();

    let err = factory.get_bean("outer").unwrap_err();

    assert!(matches!(
        err,
        BeanError::BeanCreation { ref name, ref message, .. }
            if name == "outer" && message.contains("inner bean for property 'spouse'")
    ));
    assert!(matches!(
        err.root_cause(),
        BeanError::TypeMismatch { name, .. } if name == "(inner bean for property 'outer.spouse')"
    ));
    assert!(!factory.contains_singleton("outer"));
}

#[test]
fn inner_bean_may_inherit_from_a_registered_definition() {
    let mut factory = DefaultListableBeanFactory::new();
    factory
        .register_bean_definition(
            "person",
            BeanDefinition::of::<TestBean>()
                .abstract_definition(true)
                .property("age", "30"),
        )
        .unwrap();
    factory
        .register_bean_definition(
            "outer",
            BeanDefinition::of::<TestBean>()
                .property("spouse", BeanDefinition::child("person").property("name", "Ann")),
        )
        .unwrap();

    let outer = factory.get_bean_of::<TestBean>("outer").unwrap();
    let spouse = outer.borrow().spouse();

    assert_eq!(spouse.borrow().name, "Ann");
    assert_eq!(spouse.borrow().age, 30);
}
