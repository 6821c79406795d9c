// Wire protocol DTOs and conversions for the JSON-lines stream.

use crate::domain::{
    Effect, FireResult, FirearmState, HandId, MagazineId, RigError, SlideState,
};
use crate::use_cases::{
    DockStatus, FirearmSnapshot, GunPose, MagazineSnapshot, RigInput, RigOutcome, SimUpdate,
};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Messages the host sends into the simulation, one per line.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    FirePressed,
    EjectPressed,
    SlideGripBegan { hand: HandDto },
    SlideGripSample { position: [f32; 3] },
    SlideGripEnded { hand: HandDto },
    HandMoved { hand: HandDto, position: [f32; 3] },
    GrabZoneEntered { hand: HandDto },
    GrabZoneExited { hand: HandDto },
    MagazineEnteredDock { magazine_id: u64 },
    MagazineLeftDock { magazine_id: u64 },
    SpawnMagazine {
        #[serde(default)]
        capacity: Option<u32>,
        #[serde(default)]
        rounds: Option<i64>,
    },
    DespawnMagazine { magazine_id: u64 },
    RefillMagazine { magazine_id: u64 },
    GunMoved(GunPoseDto),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandDto {
    Left,
    Right,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GunPoseDto {
    pub rail_closed: [f32; 3],
    pub rail_open: [f32; 3],
    pub muzzle_origin: [f32; 3],
    pub muzzle_direction: [f32; 3],
}

impl From<HandDto> for HandId {
    fn from(hand: HandDto) -> Self {
        match hand {
            HandDto::Left => HandId::Left,
            HandDto::Right => HandId::Right,
        }
    }
}

impl From<HandId> for HandDto {
    fn from(hand: HandId) -> Self {
        match hand {
            HandId::Left => HandDto::Left,
            HandId::Right => HandDto::Right,
        }
    }
}

impl From<ClientMessage> for RigInput {
    fn from(message: ClientMessage) -> Self {
        match message {
            ClientMessage::FirePressed => RigInput::FirePressed,
            ClientMessage::EjectPressed => RigInput::EjectPressed,
            ClientMessage::SlideGripBegan { hand } => {
                RigInput::SlideGripBegan { hand: hand.into() }
            }
            ClientMessage::SlideGripSample { position } => RigInput::SlideGripSample {
                position: Vec3::from_array(position),
            },
            ClientMessage::SlideGripEnded { hand } => RigInput::SlideGripEnded { hand: hand.into() },
            ClientMessage::HandMoved { hand, position } => RigInput::HandMoved {
                hand: hand.into(),
                position: Vec3::from_array(position),
            },
            ClientMessage::GrabZoneEntered { hand } => {
                RigInput::GrabZoneEntered { hand: hand.into() }
            }
            ClientMessage::GrabZoneExited { hand } => RigInput::GrabZoneExited { hand: hand.into() },
            ClientMessage::MagazineEnteredDock { magazine_id } => RigInput::MagazineEnteredDock {
                magazine: MagazineId(magazine_id),
            },
            ClientMessage::MagazineLeftDock { magazine_id } => RigInput::MagazineLeftDock {
                magazine: MagazineId(magazine_id),
            },
            ClientMessage::SpawnMagazine { capacity, rounds } => {
                RigInput::SpawnMagazine { capacity, rounds }
            }
            ClientMessage::DespawnMagazine { magazine_id } => RigInput::DespawnMagazine {
                magazine: MagazineId(magazine_id),
            },
            ClientMessage::RefillMagazine { magazine_id } => RigInput::RefillMagazine {
                magazine: MagazineId(magazine_id),
            },
            ClientMessage::GunMoved(pose) => RigInput::GunMoved(GunPose {
                rail_closed: Vec3::from_array(pose.rail_closed),
                rail_open: Vec3::from_array(pose.rail_open),
                muzzle_origin: Vec3::from_array(pose.muzzle_origin),
                muzzle_direction: Vec3::from_array(pose.muzzle_direction),
            }),
        }
    }
}

/// Messages the simulation writes out, one per line.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    Update(SimUpdateDto),
}

#[derive(Debug, Clone, Serialize)]
pub struct SimUpdateDto {
    pub tick: u64,
    pub firearm: FirearmStateDto,
    pub magazines: Vec<MagazineStateDto>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub outcomes: Vec<OutcomeDto>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<EffectDto>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<String>,
}

impl From<SimUpdate> for SimUpdateDto {
    fn from(update: SimUpdate) -> Self {
        Self {
            tick: update.tick,
            firearm: FirearmStateDto::from(&update.firearm),
            magazines: update
                .magazines
                .iter()
                .map(MagazineStateDto::from)
                .collect(),
            outcomes: update.outcomes.into_iter().map(OutcomeDto::from).collect(),
            effects: update.effects.into_iter().map(EffectDto::from).collect(),
            rejected: update.rejected.iter().map(describe_error).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FirearmStateDto {
    pub state: &'static str,
    pub slide: &'static str,
    pub charge: f32,
    pub slide_position: [f32; 3],
    pub holder: Option<HandDto>,
    pub grab_enabled: bool,
    pub magazine_id: Option<u64>,
    pub rounds: Option<u32>,
    pub dock: &'static str,
}

impl From<&FirearmSnapshot> for FirearmStateDto {
    fn from(snapshot: &FirearmSnapshot) -> Self {
        Self {
            state: match snapshot.state {
                FirearmState::Idle => "idle",
                FirearmState::Cooldown => "cooldown",
                FirearmState::Locked => "locked",
            },
            slide: match snapshot.slide_state {
                SlideState::Closed => "closed",
                SlideState::Traveling => "traveling",
                SlideState::Open => "open",
                SlideState::Locked => "locked",
            },
            charge: snapshot.charge,
            slide_position: snapshot.slide_position.to_array(),
            holder: snapshot.holder.map(HandDto::from),
            grab_enabled: snapshot.grab_enabled,
            magazine_id: snapshot.magazine.map(|id| id.0),
            rounds: snapshot.rounds,
            dock: match snapshot.dock {
                DockStatus::Vacant => "vacant",
                DockStatus::Spent => "spent",
                DockStatus::AwaitingCharge => "awaiting_charge",
                DockStatus::Ready => "ready",
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MagazineStateDto {
    pub id: u64,
    pub capacity: u32,
    pub rounds: u32,
    pub docked: bool,
}

impl From<&MagazineSnapshot> for MagazineStateDto {
    fn from(magazine: &MagazineSnapshot) -> Self {
        Self {
            id: magazine.id.0,
            capacity: magazine.capacity,
            rounds: magazine.rounds,
            docked: magazine.docked,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutcomeDto {
    Fire { result: &'static str },
    Ejected { magazine_id: Option<u64> },
    Spawned { magazine_id: u64 },
    GripStarted { accepted: bool },
    GripEnded { charged: bool },
    Applied,
}

impl From<RigOutcome> for OutcomeDto {
    fn from(outcome: RigOutcome) -> Self {
        match outcome {
            RigOutcome::Applied => OutcomeDto::Applied,
            RigOutcome::Fire(result) => OutcomeDto::Fire {
                result: match result {
                    FireResult::Fired => "fired",
                    FireResult::Dry => "dry",
                    FireResult::Blocked => "blocked",
                },
            },
            RigOutcome::Ejected(id) => OutcomeDto::Ejected {
                magazine_id: id.map(|id| id.0),
            },
            RigOutcome::Spawned(id) => OutcomeDto::Spawned { magazine_id: id.0 },
            RigOutcome::GripStarted(accepted) => OutcomeDto::GripStarted { accepted },
            RigOutcome::GripEnded { charged } => OutcomeDto::GripEnded { charged },
        }
    }
}

/// Effect tags plus payload for the audio/animation/physics consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectDto {
    ShotFired,
    DryFire,
    MagazineInserted {
        magazine_id: u64,
    },
    MagazineRemoved {
        magazine_id: u64,
    },
    MagazineEjected {
        magazine_id: u64,
        impulse: [f32; 3],
    },
    SlideLocked,
    SlideUnlocked,
    HitTestRequested {
        origin: [f32; 3],
        direction: [f32; 3],
        max_range: f32,
    },
}

impl From<Effect> for EffectDto {
    fn from(effect: Effect) -> Self {
        match effect {
            Effect::ShotFired => EffectDto::ShotFired,
            Effect::DryFire => EffectDto::DryFire,
            Effect::MagazineInserted { magazine } => EffectDto::MagazineInserted {
                magazine_id: magazine.0,
            },
            Effect::MagazineRemoved { magazine } => EffectDto::MagazineRemoved {
                magazine_id: magazine.0,
            },
            Effect::MagazineEjected { magazine, impulse } => EffectDto::MagazineEjected {
                magazine_id: magazine.0,
                impulse: impulse.to_array(),
            },
            Effect::SlideLocked => EffectDto::SlideLocked,
            Effect::SlideUnlocked => EffectDto::SlideUnlocked,
            Effect::HitTestRequested {
                origin,
                direction,
                max_range,
            } => EffectDto::HitTestRequested {
                origin: origin.to_array(),
                direction: direction.to_array(),
                max_range,
            },
        }
    }
}

fn describe_error(error: &RigError) -> String {
    match error {
        RigError::UnknownMagazine(id) => format!("unknown magazine {}", id.0),
        RigError::MagazineAlreadyDocked(id) => format!("magazine {} is already docked", id.0),
        RigError::DockOccupied { docked } => format!("dock already holds magazine {}", docked.0),
        RigError::SpawnLimitReached { loose } => {
            format!("magazine {} is still loose; spawn refused", loose.0)
        }
        RigError::InvalidCapacity => "magazine capacity must be positive".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn when_hand_moved_line_is_parsed_then_it_maps_to_rig_input() {
        let message: ClientMessage = serde_json::from_str(
            r#"{"type":"HandMoved","data":{"hand":"right","position":[0.1,0.2,0.3]}}"#,
        )
        .expect("valid message");

        assert_eq!(
            RigInput::from(message),
            RigInput::HandMoved {
                hand: HandId::Right,
                position: Vec3::new(0.1, 0.2, 0.3),
            }
        );
    }

    #[test]
    fn when_unit_message_has_no_data_then_it_still_parses() {
        let message: ClientMessage =
            serde_json::from_str(r#"{"type":"FirePressed"}"#).expect("valid message");
        assert_eq!(RigInput::from(message), RigInput::FirePressed);
    }

    #[test]
    fn when_spawn_has_no_overrides_then_defaults_are_left_to_the_rig() {
        let message: ClientMessage =
            serde_json::from_str(r#"{"type":"SpawnMagazine","data":{"rounds":-4}}"#)
                .expect("valid message");
        assert_eq!(
            RigInput::from(message),
            RigInput::SpawnMagazine {
                capacity: None,
                rounds: Some(-4),
            }
        );
    }

    #[test]
    fn when_effect_is_serialized_then_kind_tag_and_payload_are_flat() {
        let value = serde_json::to_value(EffectDto::from(Effect::MagazineEjected {
            magazine: MagazineId(3),
            impulse: Vec3::new(0.0, -1.5, 0.0),
        }))
        .expect("serializable");

        assert_eq!(
            value,
            json!({"kind": "magazine_ejected", "magazine_id": 3, "impulse": [0.0, -1.5, 0.0]})
        );
    }

    #[test]
    fn when_update_is_serialized_then_empty_lists_are_omitted() {
        let update = SimUpdate {
            tick: 4,
            firearm: FirearmSnapshot {
                state: FirearmState::Locked,
                slide_state: SlideState::Locked,
                charge: 1.0,
                slide_position: Vec3::new(0.0, 0.0, -0.5),
                holder: None,
                grab_enabled: false,
                magazine: Some(MagazineId(2)),
                rounds: Some(0),
                dock: DockStatus::Spent,
            },
            magazines: Vec::new(),
            outcomes: Vec::new(),
            effects: vec![Effect::SlideLocked],
            rejected: Vec::new(),
        };

        let value = serde_json::to_value(ServerMessage::Update(SimUpdateDto::from(update)))
            .expect("serializable");

        assert_eq!(value["type"], "Update");
        assert_eq!(value["data"]["firearm"]["state"], "locked");
        assert_eq!(value["data"]["firearm"]["dock"], "spent");
        assert_eq!(
            value["data"]["firearm"]["slide_position"],
            json!([0.0, 0.0, -0.5])
        );
        assert_eq!(value["data"]["effects"], json!([{"kind": "slide_locked"}]));
        assert!(value["data"].get("rejected").is_none());
        assert!(value["data"].get("outcomes").is_none());
    }

    #[test]
    fn when_unknown_type_is_sent_then_parsing_fails() {
        let result = serde_json::from_str::<ClientMessage>(r#"{"type":"Reload"}"#);
        assert!(result.is_err());
    }
}
