//! Tests for lock-on selector.

#[cfg(test)]
mod tests {
    use super::super::selector::*;
    use bevy::prelude::*;

    fn entity(index: u32) -> Entity {
        Entity::from_raw(index)
    }

    fn candidate(index: u32, distance: f32) -> LockOnCandidate {
        LockOnCandidate {
            entity: entity(index),
            position: Vec3::new(0.0, 0.0, -distance),
            marker: None,
        }
    }

    #[test]
    fn test_acquires_nearest() {
        let candidates = [candidate(1, 5.0), candidate(2, 3.0), candidate(3, 8.0)];
        let mut selector = LockOnSelector::default();

        assert_eq!(
            selector.toggle(Vec3::ZERO, &candidates),
            LockOnUpdate::Acquired(entity(2))
        );
        assert_eq!(selector.target(), Some(entity(2)));
        // Без маркера: root + (0, 1.2, 0)
        assert_eq!(selector.current_target(), Some(Vec3::new(0.0, 1.2, -3.0)));
    }

    #[test]
    fn test_removed_target_clears_session() {
        let candidates = [candidate(1, 5.0), candidate(2, 3.0), candidate(3, 8.0)];
        let mut selector = LockOnSelector::default();
        selector.toggle(Vec3::ZERO, &candidates);

        assert_eq!(selector.refresh(None, None), LockOnUpdate::Released(entity(2)));
        assert!(selector.session().is_none());
        assert_eq!(selector.current_target(), None);
    }

    #[test]
    fn test_refresh_tracks_moving_target() {
        let mut selector = LockOnSelector::default();
        selector.toggle(Vec3::ZERO, &[candidate(1, 5.0)]);

        assert_eq!(
            selector.refresh(Some(Vec3::new(2.0, 0.0, -4.0)), None),
            LockOnUpdate::Unchanged
        );
        assert_eq!(selector.current_target(), Some(Vec3::new(2.0, 1.2, -4.0)));
    }

    #[test]
    fn test_marker_aim_point_and_marker_loss() {
        let mut with_marker = candidate(1, 4.0);
        with_marker.marker = Some((entity(10), Vec3::new(0.0, 1.7, -4.0)));
        let mut selector = LockOnSelector::default();
        selector.toggle(Vec3::ZERO, &[with_marker]);

        assert_eq!(selector.current_target(), Some(Vec3::new(0.0, 1.7, -4.0)));
        assert_eq!(
            selector.session().map(|session| session.aim),
            Some(AimPointRef::Marker(entity(10)))
        );

        // Цель на месте, но маркер исчез: тоже release
        assert_eq!(
            selector.refresh(Some(Vec3::new(0.0, 0.0, -4.0)), None),
            LockOnUpdate::Released(entity(1))
        );
    }

    #[test]
    fn test_out_of_radius_not_acquired() {
        let mut selector = LockOnSelector::default();
        assert_eq!(
            selector.toggle(Vec3::ZERO, &[candidate(1, 25.0)]),
            LockOnUpdate::Unchanged
        );
        assert!(selector.session().is_none());
    }

    #[test]
    fn test_toggle_releases() {
        let candidates = [candidate(1, 5.0)];
        let mut selector = LockOnSelector::default();
        selector.toggle(Vec3::ZERO, &candidates);
        assert_eq!(
            selector.toggle(Vec3::ZERO, &candidates),
            LockOnUpdate::Released(entity(1))
        );
    }

    #[test]
    fn test_tie_broken_by_input_order() {
        let candidates = [candidate(4, 3.0), candidate(2, 3.0)];
        let nearest = nearest_candidate(Vec3::ZERO, 20.0, &candidates, None).unwrap();
        assert_eq!(nearest.entity, entity(4));
    }

    #[test]
    fn test_switch_once_per_deflection() {
        let candidates = [candidate(1, 3.0), candidate(2, 5.0), candidate(3, 8.0)];
        let mut selector = LockOnSelector::default();
        selector.toggle(Vec3::ZERO, &candidates);

        let flick = Vec2::new(0.9, 0.0);
        assert_eq!(
            selector.update_switch(Vec3::ZERO, flick, &candidates),
            LockOnUpdate::Switched {
                from: entity(1),
                to: entity(2)
            }
        );
        // Стик всё ещё отклонён: повторного переключения нет
        for _ in 0..10 {
            assert_eq!(
                selector.update_switch(Vec3::ZERO, flick, &candidates),
                LockOnUpdate::Unchanged
            );
        }

        // Вернули стик → re-arm → следующее отклонение переключает обратно на ближайшую другую
        selector.update_switch(Vec3::ZERO, Vec2::ZERO, &candidates);
        assert_eq!(
            selector.update_switch(Vec3::ZERO, Vec2::new(-0.8, 0.0), &candidates),
            LockOnUpdate::Switched {
                from: entity(2),
                to: entity(1)
            }
        );
    }

    #[test]
    fn test_switch_without_other_candidate_disarms() {
        let candidates = [candidate(1, 3.0)];
        let mut selector = LockOnSelector::default();
        selector.toggle(Vec3::ZERO, &candidates);

        let flick = Vec2::new(1.0, 0.0);
        assert_eq!(
            selector.update_switch(Vec3::ZERO, flick, &candidates),
            LockOnUpdate::Unchanged
        );
        assert_eq!(selector.target(), Some(entity(1)));
        assert_eq!(selector.session().map(|session| session.switch_armed), Some(false));
    }

    #[test]
    fn test_switch_without_session_is_noop() {
        let mut selector = LockOnSelector::default();
        assert_eq!(
            selector.update_switch(Vec3::ZERO, Vec2::X, &[candidate(1, 3.0)]),
            LockOnUpdate::Unchanged
        );
        assert!(selector.session().is_none());
    }

    #[test]
    fn test_invalid_radius_rejected() {
        let config = LockOnConfig {
            search_radius: 0.0,
            ..default()
        };
        assert!(config.validate().is_err());
    }
}
