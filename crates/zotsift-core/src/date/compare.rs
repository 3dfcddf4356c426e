use bitflags::bitflags;

use super::{DateRange, PartialDate};

bitflags! {
    /// One bit per (bound side, precision) pair.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    struct BoundBits: u8 {
        const BEFORE_YEAR = 1 << 0;
        const BEFORE_MONTH = 1 << 1;
        const BEFORE_DAY = 1 << 2;
        const AFTER_YEAR = 1 << 3;
        const AFTER_MONTH = 1 << 4;
        const AFTER_DAY = 1 << 5;
    }
}

#[derive(Debug, Default)]
struct BoundCheck {
    constrained: BoundBits,
    satisfied: BoundBits,
}

impl BoundCheck {
    // A component the subject does not carry cannot violate the bound.
    fn check<T>(
        &mut self,
        bit: BoundBits,
        bound: Option<T>,
        subject: Option<T>,
        holds: impl Fn(&T, &T) -> bool,
    ) {
        let Some(bound) = bound else {
            return;
        };
        self.constrained |= bit;
        match subject {
            Some(subject) if !holds(&bound, &subject) => {}
            _ => self.satisfied |= bit,
        }
    }

    fn passed(&self) -> bool {
        self.satisfied == self.constrained
    }
}

/// Every granularity present on a bound is checked on its own: `before:2000-05`
/// requires `year <= 2000` and `month <= 5`, not a combined calendar ordering.
#[must_use]
pub fn matches(range: &DateRange, subject: &PartialDate) -> bool {
    let mut check = BoundCheck::default();

    if let Some(bound) = range.before {
        check.check(
            BoundBits::BEFORE_YEAR,
            Some(bound.year),
            Some(subject.year),
            not_after_bound,
        );
        check.check(
            BoundBits::BEFORE_MONTH,
            bound.effective_month(),
            subject.effective_month(),
            not_after_bound,
        );
        check.check(
            BoundBits::BEFORE_DAY,
            bound.effective_day(),
            subject.effective_day(),
            not_after_bound,
        );
    }
    if let Some(bound) = range.after {
        check.check(
            BoundBits::AFTER_YEAR,
            Some(bound.year),
            Some(subject.year),
            not_before_bound,
        );
        check.check(
            BoundBits::AFTER_MONTH,
            bound.effective_month(),
            subject.effective_month(),
            not_before_bound,
        );
        check.check(
            BoundBits::AFTER_DAY,
            bound.effective_day(),
            subject.effective_day(),
            not_before_bound,
        );
    }
    check.passed()
}

fn not_after_bound<T: PartialOrd>(bound: &T, subject: &T) -> bool {
    bound >= subject
}

fn not_before_bound<T: PartialOrd>(bound: &T, subject: &T) -> bool {
    bound <= subject
}
