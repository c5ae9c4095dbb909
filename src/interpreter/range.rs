/// Step magnitude used when a loop does not give one.
pub const DEFAULT_STEP: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Shape {
    Single,
    Ascending { inclusive: bool },
    Descending { inclusive: bool },
}

/// The values a loop variable takes, produced lazily.
///
/// The `i`th value is `start + i * step`, so long ranges do not accumulate rounding
/// error the way repeated addition would.
#[derive(Debug, Clone)]
pub struct Range {
    start: f64,
    end: f64,
    step: f64,
    shape: Shape,
    index: u64,
    done: bool,
}

impl Range {
    /// A range from `start` towards `end`. The step defaults to [`DEFAULT_STEP`] in the
    /// direction of `end`; an explicit step is used as given. Equal bounds (or bounds
    /// that can't be ordered) produce exactly one value.
    pub fn new(start: f64, end: f64, step: Option<f64>, inclusive: bool) -> Self {
        let shape = if start < end {
            Shape::Ascending { inclusive }
        } else if start > end {
            Shape::Descending { inclusive }
        } else {
            Shape::Single
        };
        let step = match (step, shape) {
            (Some(step), _) => step,
            (None, Shape::Descending { .. }) => -DEFAULT_STEP,
            (None, _) => DEFAULT_STEP,
        };
        Self {
            start,
            end,
            step,
            shape,
            index: 0,
            done: false,
        }
    }

    /// A range holding only `value`.
    pub fn single(value: f64) -> Self {
        Self::new(value, value, None, true)
    }
}

impl Iterator for Range {
    type Item = f64;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let value = self.start + self.index as f64 * self.step;
        let keep_going = match self.shape {
            Shape::Single => {
                self.done = true;
                return Some(self.start);
            }
            Shape::Ascending { inclusive: false } => value < self.end,
            Shape::Ascending { inclusive: true } => value <= self.end,
            Shape::Descending { inclusive: false } => value > self.end,
            Shape::Descending { inclusive: true } => value >= self.end,
        };

        if keep_going {
            self.index += 1;
            Some(value)
        } else {
            self.done = true;
            None
        }
    }
}
