use std::collections::HashMap;

use gl::types::GLenum;
use sdl2::keyboard::Scancode;

use crate::ogl::Driver;

type Callback<C, R> = Box<dyn FnMut(&mut C) -> R>;

/// Key press subscriptions.
///
/// Every key can have any number of subscribers, all of them get called on a press.
/// `C` is the context handed to the callbacks and `R` is what they return.
pub struct KeyBindings<C, R = ()> {
    bindings: HashMap<Scancode, Vec<Callback<C, R>>>,
}

impl<C, R> KeyBindings<C, R> {
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    pub fn subscribe(&mut self, key: Scancode, callback: impl FnMut(&mut C) -> R + 'static) {
        self.bindings
            .entry(key)
            .or_default()
            .push(Box::new(callback));
    }

    /// Calls every subscriber of `key` in subscription order and collects the results
    pub fn dispatch(&mut self, key: Scancode, ctx: &mut C) -> Vec<R> {
        match self.bindings.get_mut(&key) {
            Some(callbacks) => callbacks.iter_mut().map(|callback| callback(ctx)).collect(),
            None => Vec::new(),
        }
    }

    pub fn subscribers(&self, key: Scancode) -> usize {
        self.bindings.get(&key).map_or(0, Vec::len)
    }
}

impl<C, R> Default for KeyBindings<C, R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Filled or wireframe rasterization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolygonMode {
    #[default]
    Fill,
    Line,
}

impl PolygonMode {
    pub fn gl_enum(self) -> GLenum {
        match self {
            PolygonMode::Fill => gl::FILL,
            PolygonMode::Line => gl::LINE,
        }
    }

    /// Switches between fill and line and returns the new mode
    pub fn toggle(&mut self) -> Self {
        *self = match self {
            PolygonMode::Fill => PolygonMode::Line,
            PolygonMode::Line => PolygonMode::Fill,
        };
        *self
    }

    pub fn apply<D: Driver>(self, driver: &D) {
        driver.polygon_mode(gl::FRONT_AND_BACK, self.gl_enum());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ogl::stub::StubDriver;

    #[test]
    fn dispatch_broadcasts_in_order() {
        let mut bindings = KeyBindings::<Vec<&str>, usize>::new();
        bindings.subscribe(Scancode::F, |log| {
            log.push("first");
            log.len()
        });
        bindings.subscribe(Scancode::F, |log| {
            log.push("second");
            log.len()
        });

        let mut log = Vec::new();
        assert_eq!(bindings.dispatch(Scancode::F, &mut log), vec![1, 2]);
        assert_eq!(log, vec!["first", "second"]);
        assert_eq!(bindings.subscribers(Scancode::F), 2);
    }

    #[test]
    fn unbound_key_does_nothing() {
        let mut bindings = KeyBindings::<u32>::new();
        bindings.subscribe(Scancode::Escape, |count| *count += 1);

        let mut count = 0;
        assert!(bindings.dispatch(Scancode::Q, &mut count).is_empty());
        assert_eq!(count, 0);
    }

    #[test]
    fn polygon_mode_toggles() {
        let driver = StubDriver::new();
        let mut mode = PolygonMode::default();

        assert_eq!(mode.toggle(), PolygonMode::Line);
        mode.apply(&driver);
        assert_eq!(mode.toggle(), PolygonMode::Fill);
        mode.apply(&driver);

        assert_eq!(
            driver.state().polygon_modes,
            vec![gl::LINE, gl::FILL]
        );
    }
}
