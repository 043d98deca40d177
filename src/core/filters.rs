use crate::models::{Host, OpportunityType, Student};

/// Check whether a (student, host) pair is statically compatible
///
/// This is the hard-constraint gate evaluated before any scoring. Capacity is not
/// checked here; remaining capacity is working state the solver enforces as it
/// commits assignments.
#[inline]
pub fn is_legal(student: &Student, host: &Host) -> bool {
    // Citizenship requirement
    if host.requires_citizenship && !student.is_citizen {
        return false;
    }

    // Background check requirement
    if host.requires_background_check && !student.accepts_background_check {
        return false;
    }

    // Day overlap, unless either side declared availability flexible/unsure
    if !availability_compatible(student, host) {
        return false;
    }

    // Transportation: a student without a ride needs a metro-accessible host,
    // except for fully virtual opportunities
    if student.needs_transportation
        && !host.metro_accessible
        && host.opportunity_type != OpportunityType::Virtual
    {
        return false;
    }

    true
}

/// Day-overlap check with the flexible-availability escape hatch
///
/// An empty day set is treated the same as the flexible flag: the entity has not
/// constrained its schedule, so the overlap check is skipped.
#[inline]
pub fn availability_compatible(student: &Student, host: &Host) -> bool {
    if student.availability_flexible || host.availability_flexible {
        return true;
    }
    if student.available_days.is_empty() || host.available_days.is_empty() {
        return true;
    }

    student
        .available_days
        .iter()
        .any(|day| host.available_days.contains(day))
}
