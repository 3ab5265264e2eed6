use std::{cell::RefCell, collections::HashMap};

use glam::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};

use crate::ogl::Driver;

/// Location of a uniform that doesn't exist or was optimized out
pub const INVALID_LOCATION: i32 = -1;

/// Memoizes uniform locations of one linked program.
///
/// A location can't change while the program lives, so entries are never evicted.
/// `-1` results are cached too.
pub struct UniformCache {
    enabled: bool,
    locations: RefCell<HashMap<String, i32>>,
}

impl UniformCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            locations: RefCell::new(HashMap::new()),
        }
    }

    /// Returns the location of `name` in `program`, asking the driver at most once per name
    /// when caching is enabled.
    pub fn location<D: Driver>(&self, driver: &D, program: u32, name: &str) -> i32 {
        if !self.enabled {
            return driver.uniform_location(program, name);
        }

        if let Some(&loc) = self.locations.borrow().get(name) {
            return loc;
        }

        let loc = driver.uniform_location(program, name);
        if loc == INVALID_LOCATION {
            tracing::debug!(program, "uniform '{name}' not found");
        }

        self.locations.borrow_mut().insert(name.to_owned(), loc);
        loc
    }

    pub fn len(&self) -> usize {
        self.locations.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A value that can be written to a uniform location.
pub trait Uniform {
    fn set<D: Driver>(&self, driver: &D, loc: i32);
}

impl Uniform for bool {
    fn set<D: Driver>(&self, driver: &D, loc: i32) {
        driver.uniform_1i(loc, *self as i32);
    }
}

impl Uniform for i32 {
    fn set<D: Driver>(&self, driver: &D, loc: i32) {
        driver.uniform_1i(loc, *self);
    }
}

impl Uniform for u32 {
    fn set<D: Driver>(&self, driver: &D, loc: i32) {
        driver.uniform_1ui(loc, *self);
    }
}

impl Uniform for f32 {
    fn set<D: Driver>(&self, driver: &D, loc: i32) {
        driver.uniform_1f(loc, *self);
    }
}

impl Uniform for Vec2 {
    fn set<D: Driver>(&self, driver: &D, loc: i32) {
        driver.uniform_2f(loc, self.x, self.y);
    }
}

impl Uniform for Vec3 {
    fn set<D: Driver>(&self, driver: &D, loc: i32) {
        driver.uniform_3f(loc, self.x, self.y, self.z);
    }
}

impl Uniform for Vec4 {
    fn set<D: Driver>(&self, driver: &D, loc: i32) {
        driver.uniform_4f(loc, self.x, self.y, self.z, self.w);
    }
}

impl Uniform for Mat2 {
    fn set<D: Driver>(&self, driver: &D, loc: i32) {
        driver.uniform_matrix_2fv(loc, 1, &self.to_cols_array());
    }
}

impl Uniform for Mat3 {
    fn set<D: Driver>(&self, driver: &D, loc: i32) {
        driver.uniform_matrix_3fv(loc, 1, &self.to_cols_array());
    }
}

impl Uniform for Mat4 {
    fn set<D: Driver>(&self, driver: &D, loc: i32) {
        driver.uniform_matrix_4fv(loc, 1, &self.to_cols_array());
    }
}

impl Uniform for [Mat4] {
    fn set<D: Driver>(&self, driver: &D, loc: i32) {
        let mats_flat: Vec<f32> = self.iter().flat_map(|m| m.to_cols_array()).collect();
        driver.uniform_matrix_4fv(loc, self.len() as i32, &mats_flat);
    }
}
