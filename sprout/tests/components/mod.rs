#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};

use sprout::{Bean, BeanClass, BoxError, DisposableBean, InitializingBean};

#[derive(Debug, Default, Bean)]
pub(crate) struct TestBean {
    pub(crate) name: String,
    pub(crate) age: i32,
    pub(crate) spouse: Option<Rc<RefCell<TestBean>>>,
    #[bean(rename = "friend")]
    pub(crate) best_friend: Option<Rc<RefCell<TestBean>>>,
}

impl TestBean {
    pub(crate) fn spouse(&self) -> Rc<RefCell<TestBean>> {
        self.spouse.clone().expect("spouse is not set")
    }
}

#[derive(Debug, Default, Bean)]
pub(crate) struct EventLog {
    #[bean(skip)]
    pub(crate) events: Vec<String>,
}

impl EventLog {
    pub(crate) fn push(&mut self, event: impl Into<String>) {
        self.events.push(event.into());
    }
}

#[derive(Debug, Default, Bean)]
#[bean(init, destroy)]
pub(crate) struct LifecycleBean {
    pub(crate) name: String,
    pub(crate) log: Option<Rc<RefCell<EventLog>>>,
    #[bean(skip)]
    pub(crate) init_count: u32,
}

impl InitializingBean for LifecycleBean {
    fn after_properties_set(&mut self) -> Result<(), BoxError> {
        self.init_count += 1;

        if let Some(log) = &self.log {
            log.borrow_mut().push(format!("init {}", self.name));
        }

        Ok(())
    }
}

impl DisposableBean for LifecycleBean {
    fn destroy(&mut self) -> Result<(), BoxError> {
        if let Some(log) = &self.log {
            log.borrow_mut().push(format!("destroy {}", self.name));
        }

        Ok(())
    }
}

#[derive(Debug, Default, Bean)]
#[bean(init)]
pub(crate) struct FailingInitBean {
    pub(crate) name: String,
}

impl InitializingBean for FailingInitBean {
    fn after_properties_set(&mut self) -> Result<(), BoxError> {
        Err(format!("{} refuses to start", self.name).into())
    }
}

#[derive(Debug, Default, Bean)]
pub(crate) struct Flags {
    pub(crate) enabled: bool,
    pub(crate) ratio: f64,
}

pub(crate) struct Shape;

/// A class without a constructor.
pub(crate) fn shape_class() -> BeanClass {
    BeanClass::builder_with_name::<Shape>("Shape").build()
}

pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("sprout=debug"))
        .with_test_writer()
        .try_init();
}
