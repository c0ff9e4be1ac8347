mod components;

use std::rc::Rc;

use sprout::{BeanDefinition, BeanError, BeanFactory, DefaultListableBeanFactory, Scope};

use crate::components::{shape_class, LifecycleBean, TestBean};

fn factory_with(name: &'static str, definition: BeanDefinition) -> DefaultListableBeanFactory {
    let mut factory = DefaultListableBeanFactory::new();
    factory.register_bean_definition(name, definition).unwrap();
    factory
}

#[test]
fn singleton_is_created_once() {
    let factory = factory_with("tom", BeanDefinition::of::<TestBean>().property("name", "Tom"));

    let first = factory.get_bean_of::<TestBean>("tom").unwrap();
    let second = factory.get_bean_of::<TestBean>("tom").unwrap();

    assert!(Rc::ptr_eq(&first, &second));
    assert_eq!(first.borrow().name, "Tom");
    assert!(factory.contains_singleton("tom"));
    assert_eq!(factory.singleton_count(), 1);
}

#[test]
fn prototype_is_created_on_every_request() {
    let factory = factory_with(
        "tom",
        BeanDefinition::of::<TestBean>()
            .scope(Scope::Prototype)
            .property("name", "Tom"),
    );

    let first = factory.get_bean("tom").unwrap();
    let second = factory.get_bean("tom").unwrap();

    assert!(!first.ptr_eq(&second));
    assert_eq!(first.downcast::<TestBean>().unwrap().borrow().name, "Tom");
    assert_eq!(second.downcast::<TestBean>().unwrap().borrow().name, "Tom");
    assert!(!factory.contains_singleton("tom"));
    assert!(!factory.is_singleton("tom").unwrap());
}

#[test]
fn integer_literals_are_converted() {
    let factory = factory_with(
        "tom",
        BeanDefinition::of::<TestBean>().property("age", "5"),
    );

    assert_eq!(factory.get_bean_of::<TestBean>("tom").unwrap().borrow().age, 5);
}

#[test]
fn invalid_integer_literal_is_a_type_mismatch() {
    let factory = factory_with(
        "tom",
        BeanDefinition::of::<TestBean>().property("age", "five"),
    );

    let err = factory.get_bean("tom").unwrap_err();

    assert!(
        matches!(err, BeanError::BeanCreation { ref name, ref message, .. } if name == "tom" && message == "error setting property values")
    );
    assert!(
        matches!(err.root_cause(), BeanError::TypeMismatch { property, .. } if property == "age")
    );
    assert!(!factory.contains_singleton("tom"));
}

#[test]
fn empty_name_is_an_invalid_argument() {
    let factory = DefaultListableBeanFactory::new();

    assert!(matches!(
        factory.get_bean(""),
        Err(BeanError::InvalidArgument)
    ));
}

#[test]
fn unknown_name_is_not_found() {
    let factory = DefaultListableBeanFactory::new();

    let err = factory.get_bean("nobody").unwrap_err();

    assert!(matches!(err, BeanError::NotFound { ref name } if name == "nobody"));
    assert!(!factory.contains_bean("nobody"));
}

#[test]
fn typed_lookup_checks_the_type() {
    let factory = factory_with("tom", BeanDefinition::of::<TestBean>());

    let err = factory.get_bean_of::<LifecycleBean>("tom").unwrap_err();

    assert!(matches!(
        err,
        BeanError::BeanNotOfRequiredType { ref name, .. } if name == "tom"
    ));
    assert!(factory.get_bean("tom").unwrap().is::<TestBean>());
}

#[test]
fn abstract_definition_cannot_be_instantiated() {
    let factory = factory_with(
        "template",
        BeanDefinition::of::<TestBean>().abstract_definition(true),
    );

    assert!(matches!(
        factory.get_bean("template"),
        Err(BeanError::Instantiation { ref name, .. }) if name == "template"
    ));
}

#[test]
fn class_without_constructor_cannot_be_instantiated() {
    let factory = factory_with("shape", BeanDefinition::new(shape_class()));

    let err = factory.get_bean("shape").unwrap_err();

    assert!(
        matches!(err, BeanError::Instantiation { ref reason, .. } if reason.contains("has no constructor"))
    );
    assert_eq!(factory.singleton_count(), 0);
    assert!(factory.creation_chain().is_empty());
}

#[test]
fn contains_and_is_singleton_follow_definitions() {
    let mut factory = DefaultListableBeanFactory::new();
    factory
        .register_bean_definition("single", BeanDefinition::of::<TestBean>())
        .unwrap();
    factory
        .register_bean_definition("proto", BeanDefinition::of::<TestBean>().singleton(false))
        .unwrap();

    assert!(factory.contains_bean("single"));
    assert!(factory.contains_bean_definition("proto"));
    assert!(factory.is_singleton("single").unwrap());
    assert!(!factory.is_singleton("proto").unwrap());
    assert!(factory.is_singleton("nobody").unwrap_err().is_not_found());

    // nothing is created by these queries
    assert_eq!(factory.singleton_count(), 0);
}
