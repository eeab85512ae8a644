use std::cell::RefCell;
use std::rc::Rc;

use test_garden::{Garden, GardenError, Summary, check};

#[derive(Debug, Default)]
struct Thing {
    foo: Option<String>,
    released: bool,
}

impl Thing {
    fn shared() -> Rc<RefCell<Thing>> {
        Rc::new(RefCell::new(Thing::default()))
    }

    fn ok(&self) -> bool {
        !self.released
    }

    fn release(&mut self) {
        self.released = true;
    }
}

fn release_on_exit(g: &Garden, thing: &Rc<RefCell<Thing>>) {
    let thing = Rc::clone(thing);
    g.cleanup(move || thing.borrow_mut().release());
}

pub fn run(garden: Garden) -> Result<Summary, GardenError> {
    garden.run("Thing", |g| {
        let thing = Thing::shared();
        release_on_exit(g, &thing);
        check!(thing.borrow().ok());

        g.scenario("assign foo", |_| {
            thing.borrow_mut().foo = Some("baz".to_string());
            check!(thing.borrow().foo.as_deref() == Some("baz"));
        });

        g.scenario("compare foo in two instances", |g| {
            let other = Thing::shared();
            release_on_exit(g, &other);
            check!(thing.borrow().foo == other.borrow().foo);
        });

        g.stub("serialize foo");
    })
}
