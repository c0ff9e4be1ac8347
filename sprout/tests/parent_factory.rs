mod components;

use std::rc::Rc;

use sprout::{BeanDefinition, BeanFactory, DefaultListableBeanFactory};

use crate::components::TestBean;

fn parent() -> Rc<DefaultListableBeanFactory> {
    let mut parent = DefaultListableBeanFactory::new();
    parent
        .register_bean_definition("shared", BeanDefinition::of::<TestBean>().property("name", "parent"))
        .unwrap();
    parent
        .register_bean_definition("overridden", BeanDefinition::of::<TestBean>().property("name", "parent"))
        .unwrap();
    parent
        .register_bean_definition("proto", BeanDefinition::of::<TestBean>().singleton(false))
        .unwrap();

    Rc::new(parent)
}

#[test]
fn unknown_names_are_delegated_to_the_parent() {
    let parent = parent();
    let child = DefaultListableBeanFactory::options()
        .parent(parent.clone())
        .build();

    let from_child = child.get_bean_of::<TestBean>("shared").unwrap();
    let from_parent = parent.get_bean_of::<TestBean>("shared").unwrap();

    assert!(Rc::ptr_eq(&from_child, &from_parent));
    assert!(!child.contains_singleton("shared"));
    assert!(parent.contains_singleton("shared"));
}

#[test]
fn local_definition_shadows_the_parent() {
    let mut child = DefaultListableBeanFactory::options().parent(parent()).build();
    child
        .register_bean_definition("overridden", BeanDefinition::of::<TestBean>().property("name", "child"))
        .unwrap();

    let bean = child.get_bean_of::<TestBean>("overridden").unwrap();
    assert_eq!(bean.borrow().name, "child");
}

#[test]
fn local_bean_may_reference_a_parent_bean() {
    let parent = parent();
    let mut child = DefaultListableBeanFactory::options()
        .parent(parent.clone())
        .build();
    child
        .register_bean_definition("local", BeanDefinition::of::<TestBean>().property_ref("spouse", "shared"))
        .unwrap();

    let local = child.get_bean_of::<TestBean>("local").unwrap();

    assert!(Rc::ptr_eq(
        &local.borrow().spouse(),
        &parent.get_bean_of::<TestBean>("shared").unwrap()
    ));
}

#[test]
fn queries_consult_the_parent() {
    let child = DefaultListableBeanFactory::options().parent(parent()).build();

    assert!(child.contains_bean("shared"));
    assert!(!child.contains_bean_definition("shared"));
    assert!(child.is_singleton("shared").unwrap());
    assert!(!child.is_singleton("proto").unwrap());
    assert!(!child.contains_bean("nobody"));
    assert!(child.get_bean("nobody").unwrap_err().is_not_found());
}
