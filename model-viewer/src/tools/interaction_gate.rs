use bevy::prelude::*;

use crate::engine::camera::orbit::CameraMotion;
use crate::rpc::web_rpc::WebRpcInterface;

/// Whether orbit pointer input is being listened to.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum InteractionGate {
    #[default]
    Listening,
    Suspended,
}

impl InteractionGate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Listening => "listening",
            Self::Suspended => "suspended",
        }
    }

    pub fn is_listening(&self) -> bool {
        *self == Self::Listening
    }

    /// Follow the motion state. Returns the new state on a transition.
    pub fn update(&mut self, in_motion: bool) -> Option<Self> {
        let next = if in_motion {
            Self::Suspended
        } else {
            Self::Listening
        };
        if *self == next {
            return None;
        }
        *self = next;
        Some(next)
    }
}

/// Run condition for systems that read orbit pointer input.
pub fn interaction_listening(gate: Res<InteractionGate>) -> bool {
    gate.is_listening()
}

pub fn update_interaction_gate(
    motion: Res<CameraMotion>,
    mut gate: ResMut<InteractionGate>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    let Some(state) = gate.update(motion.in_motion) else {
        return;
    };

    info!("Pointer interaction {}", state.as_str());
    rpc_interface.send_notification(
        "interaction_state_changed",
        serde_json::json!({ "state": state.as_str() }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_only_on_change() {
        let mut gate = InteractionGate::default();
        assert_eq!(gate.update(false), None);
        assert_eq!(gate.update(true), Some(InteractionGate::Suspended));
        assert_eq!(gate.update(true), None);
        assert!(!gate.is_listening());
        assert_eq!(gate.update(false), Some(InteractionGate::Listening));
        assert!(gate.is_listening());
    }

    #[test]
    fn motion_suspends_and_restores_listening() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<CameraMotion>()
            .init_resource::<InteractionGate>()
            .init_resource::<WebRpcInterface>()
            .add_systems(Update, update_interaction_gate);

        app.world_mut().resource_mut::<CameraMotion>().in_motion = true;
        app.update();
        assert_eq!(*app.world().resource::<InteractionGate>(), InteractionGate::Suspended);

        app.world_mut().resource_mut::<CameraMotion>().in_motion = false;
        app.update();
        assert_eq!(*app.world().resource::<InteractionGate>(), InteractionGate::Listening);

        let transitions = app
            .world()
            .resource::<WebRpcInterface>()
            .pending_notifications()
            .filter(|method| *method == "interaction_state_changed")
            .count();
        assert_eq!(transitions, 2);
    }
}
