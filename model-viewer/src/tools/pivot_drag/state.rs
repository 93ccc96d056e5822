use bevy::prelude::*;

/// What the pivot tool is holding. The pivot point outlives the drag so the
/// wheel can keep zooming about it.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct PivotDragState {
    grabbed: Option<Entity>,
    pivot: Option<Vec3>,
    surface_hit: bool,
    last_cursor: Option<Vec2>,
    dragging: bool,
}

impl PivotDragState {
    pub fn grab(&mut self, entity: Entity, pivot: Vec3, surface_hit: bool, cursor: Vec2) {
        self.grabbed = Some(entity);
        self.pivot = Some(pivot);
        self.surface_hit = surface_hit;
        self.last_cursor = Some(cursor);
        self.dragging = true;
    }

    pub fn release(&mut self) {
        self.dragging = false;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn grabbed(&self) -> Option<Entity> {
        self.grabbed
    }

    pub fn pivot(&self) -> Option<Vec3> {
        self.pivot
    }

    pub fn surface_hit(&self) -> bool {
        self.surface_hit
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Drop the last pointer position; the next delta starts from scratch.
    pub fn forget_cursor(&mut self) {
        self.last_cursor = None;
    }

    /// Pointer travel since the last call while dragging.
    pub fn drag_delta(&mut self, cursor: Vec2) -> Option<Vec2> {
        if !self.dragging {
            return None;
        }
        let last = self.last_cursor.replace(cursor)?;
        Some(cursor - last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_deltas_only_while_held() {
        let mut world = World::new();
        let entity = world.spawn_empty().id();
        let mut state = PivotDragState::default();
        assert_eq!(state.drag_delta(Vec2::ONE), None);

        state.grab(entity, Vec3::X, true, Vec2::new(10.0, 10.0));
        assert_eq!(state.drag_delta(Vec2::new(15.0, 8.0)), Some(Vec2::new(5.0, -2.0)));
        assert_eq!(state.drag_delta(Vec2::new(15.0, 8.0)), Some(Vec2::ZERO));

        state.release();
        assert_eq!(state.drag_delta(Vec2::new(40.0, 40.0)), None);
        assert_eq!(state.pivot(), Some(Vec3::X));

        state.clear();
        assert_eq!(state.pivot(), None);
        assert_eq!(state.grabbed(), None);
    }

    #[test]
    fn forgotten_cursor_restarts_the_delta() {
        let mut world = World::new();
        let entity = world.spawn_empty().id();
        let mut state = PivotDragState::default();
        state.grab(entity, Vec3::X, true, Vec2::ZERO);

        state.forget_cursor();
        assert_eq!(state.drag_delta(Vec2::new(300.0, 200.0)), None);
        assert_eq!(state.drag_delta(Vec2::new(305.0, 200.0)), Some(Vec2::new(5.0, 0.0)));
    }
}
