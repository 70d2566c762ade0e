// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{Alliance, FieldSize, Pose, PoseSelector};
use std::sync::{Arc, Mutex};

/// Fixed reef and station poses, given for the blue alliance and mirrored
/// for red
#[derive(Clone)]
pub struct FieldPoseSelector {
    reef: Pose,
    station: Pose,
    field: FieldSize,
    alliance: Arc<Mutex<Alliance>>,
}

impl FieldPoseSelector {
    pub fn new(reef: Pose, station: Pose, field: FieldSize, alliance: Alliance) -> Self {
        Self {
            reef,
            station,
            field,
            alliance: Arc::new(Mutex::new(alliance)),
        }
    }

    pub fn alliance(&self) -> Alliance {
        *self.alliance.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Takes effect for drive tasks initialized afterwards
    pub fn set_alliance(&self, alliance: Alliance) {
        *self.alliance.lock().unwrap_or_else(|e| e.into_inner()) = alliance;
    }

    fn for_alliance(&self, pose: Pose) -> Pose {
        match self.alliance() {
            Alliance::Blue => pose,
            Alliance::Red => pose.mirrored(&self.field),
        }
    }
}

impl PoseSelector for FieldPoseSelector {
    fn target_score_pose(&self) -> Pose {
        self.for_alliance(self.reef)
    }

    fn target_station_pose(&self) -> Pose {
        self.for_alliance(self.station)
    }
}
