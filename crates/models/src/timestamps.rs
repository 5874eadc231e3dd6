//! Audit timestamps written by the persistence layer.
//!
//! Every entity with `created_at`/`updated_at` calls [`stamp`] from its
//! `ActiveModelBehavior::before_save`, so services never set them by hand.
use chrono::{SubsecRound, Utc};
use sea_orm::{entity::prelude::DateTimeWithTimeZone, ActiveValue, Set};

/// Current time at microsecond precision, which is what the store keeps.
pub fn now() -> DateTimeWithTimeZone {
    Utc::now().trunc_subsecs(6).into()
}

/// `created_at` is set once on insert, `updated_at` on every write.
pub fn stamp(
    created_at: &mut ActiveValue<DateTimeWithTimeZone>,
    updated_at: &mut ActiveValue<DateTimeWithTimeZone>,
    insert: bool,
) {
    let ts = now();
    if insert {
        *created_at = Set(ts);
    }
    *updated_at = Set(ts);
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue::{NotSet, Unchanged};

    #[test]
    fn insert_sets_both() {
        let mut created = NotSet;
        let mut updated = NotSet;
        stamp(&mut created, &mut updated, true);
        assert!(created.is_set());
        assert!(updated.is_set());
    }

    #[test]
    fn update_keeps_created() {
        let original = now();
        let mut created = Unchanged(original);
        let mut updated = Unchanged(original);
        stamp(&mut created, &mut updated, false);
        assert_eq!(created, Unchanged(original));
        assert!(updated.is_set());
    }
}
