/// Ball physics tuning
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PhysicsConfig {
    /// Gravity acceleration, acting in -y
    pub gravity: f64,
    /// Restitution for ground bounces (0..1)
    pub ground_restitution: f64,
    /// Restitution for net collisions (0..1)
    pub net_restitution: f64,
    /// Horizontal velocity multiplier applied on each floor contact
    pub friction_factor: f64,
    pub surface_level: f64,
    pub ball_radius: f64,
    pub ball_mass: f64,
    /// Post-bounce vertical speed below which the ball settles on the floor
    pub rest_speed: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            ground_restitution: 0.8,
            net_restitution: 0.8,
            friction_factor: 0.9,
            surface_level: 0.0,
            ball_radius: 0.25,
            ball_mass: 1.0,
            rest_speed: 0.5,
        }
    }
}

impl PhysicsConfig {
    /// Height of the ball centre when resting on the floor.
    pub fn floor_height(&self) -> f64 {
        self.surface_level + self.ball_radius
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.gravity.is_finite() || self.gravity <= 0.0 {
            return Err("gravity must be finite and > 0".to_string());
        }
        for (name, value) in [
            ("ground_restitution", self.ground_restitution),
            ("net_restitution", self.net_restitution),
            ("friction_factor", self.friction_factor),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(format!("{} must be within [0, 1]", name));
            }
        }
        if !self.ball_radius.is_finite() || self.ball_radius < 0.0 {
            return Err("ball_radius must be finite and >= 0".to_string());
        }
        if !self.ball_mass.is_finite() || self.ball_mass <= 0.0 {
            return Err("ball_mass must be finite and > 0".to_string());
        }
        if !self.surface_level.is_finite() {
            return Err("surface_level must be finite".to_string());
        }
        if !self.rest_speed.is_finite() || self.rest_speed < 0.0 {
            return Err("rest_speed must be finite and >= 0".to_string());
        }
        Ok(())
    }
}

/// Shot presets. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShotConfig {
    pub flat_speed: f64,
    pub flat_angle: f64,
    pub topspin_base_speed: f64,
    pub topspin_angle: f64,
    pub topspin_spin: f64,
    pub slice_speed: f64,
    pub slice_angle: f64,
    pub slice_spin: f64,
    pub lob_base_speed: f64,
    pub lob_angle: f64,
    /// Extra speed for a fully charged topspin or lob
    pub power_speed_bonus: f64,
    /// Extra launch angle for a fully charged lob
    pub lob_power_angle_bonus: f64,
    /// Hold duration that maps to full power (seconds)
    pub max_hold_time: f64,
}

impl Default for ShotConfig {
    fn default() -> Self {
        Self {
            flat_speed: 20.0,
            flat_angle: 5.0,
            topspin_base_speed: 15.0,
            topspin_angle: 15.0,
            topspin_spin: 500.0,
            slice_speed: 12.0,
            slice_angle: 10.0,
            slice_spin: -300.0,
            lob_base_speed: 10.0,
            lob_angle: 45.0,
            power_speed_bonus: 5.0,
            lob_power_angle_bonus: 10.0,
            max_hold_time: 2.0,
        }
    }
}

impl ShotConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.max_hold_time.is_finite() || self.max_hold_time <= 0.0 {
            return Err("max_hold_time must be finite and > 0".to_string());
        }
        for (name, speed) in [
            ("flat_speed", self.flat_speed),
            ("topspin_base_speed", self.topspin_base_speed),
            ("slice_speed", self.slice_speed),
            ("lob_base_speed", self.lob_base_speed),
        ] {
            if !speed.is_finite() || speed <= 0.0 {
                return Err(format!("{} must be finite and > 0", name));
            }
        }
        for (name, angle) in [
            ("flat_angle", self.flat_angle),
            ("topspin_angle", self.topspin_angle),
            ("slice_angle", self.slice_angle),
            ("lob_angle", self.lob_angle + self.lob_power_angle_bonus),
        ] {
            if !angle.is_finite() || !(0.0..90.0).contains(&angle) {
                return Err(format!("{} must be within [0, 90) degrees", name));
            }
        }
        Ok(())
    }
}

/// Rally timing
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RallyConfig {
    /// Seconds without a player hit before an in-progress rally is evaluated
    pub idle_timeout: f64,
    /// Seconds a server waits before putting the ball in play
    pub serve_delay: f64,
}

impl Default for RallyConfig {
    fn default() -> Self {
        Self {
            idle_timeout: 5.0,
            serve_delay: 1.0,
        }
    }
}

impl RallyConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.idle_timeout.is_finite() || self.idle_timeout <= 0.0 {
            return Err("idle_timeout must be finite and > 0".to_string());
        }
        if !self.serve_delay.is_finite() || self.serve_delay < 0.0 {
            return Err("serve_delay must be finite and >= 0".to_string());
        }
        Ok(())
    }
}

/// Court geometry. The net sits on z = 0; player one owns z < 0.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CourtConfig {
    pub half_width: f64,
    pub half_length: f64,
    pub net_height: f64,
    /// Distance beyond the lines before the ball counts as having left the arena
    pub arena_margin: f64,
}

impl Default for CourtConfig {
    fn default() -> Self {
        Self {
            half_width: 6.0,
            half_length: 12.0,
            net_height: 0.9,
            arena_margin: 8.0,
        }
    }
}

impl CourtConfig {
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("half_width", self.half_width),
            ("half_length", self.half_length),
            ("net_height", self.net_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{} must be finite and > 0", name));
            }
        }
        if !self.arena_margin.is_finite() || self.arena_margin < 0.0 {
            return Err("arena_margin must be finite and >= 0".to_string());
        }
        Ok(())
    }
}

/// Player movement, stamina and reach
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerConfig {
    pub movement_speed: f64,
    pub sprint_multiplier: f64,
    pub max_stamina: f64,
    pub stamina_regen_rate: f64,
    pub stamina_depletion_rate: f64,
    /// Horizontal distance within which the ball can be struck
    pub reach_radius: f64,
    /// Highest ball centre that can be struck
    pub reach_height: f64,
    /// Ball centre height when held for a serve
    pub serve_height: f64,
    /// Distance in front of the server where the ball is held
    pub serve_offset: f64,
    /// Depth of each player's bounds behind the baseline
    pub backcourt_depth: f64,
    /// Extra width of each player's bounds outside the sidelines
    pub sideline_margin: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            movement_speed: 15.0,
            sprint_multiplier: 2.0,
            max_stamina: 100.0,
            stamina_regen_rate: 10.0,
            stamina_depletion_rate: 20.0,
            reach_radius: 2.0,
            reach_height: 3.0,
            serve_height: 2.0,
            serve_offset: 0.8,
            backcourt_depth: 8.0,
            sideline_margin: 4.0,
        }
    }
}

impl PlayerConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.movement_speed.is_finite() || self.movement_speed <= 0.0 {
            return Err("movement_speed must be finite and > 0".to_string());
        }
        if !self.sprint_multiplier.is_finite() || self.sprint_multiplier < 1.0 {
            return Err("sprint_multiplier must be finite and >= 1".to_string());
        }
        if !self.max_stamina.is_finite() || self.max_stamina <= 0.0 {
            return Err("max_stamina must be finite and > 0".to_string());
        }
        if self.stamina_regen_rate < 0.0 || self.stamina_depletion_rate < 0.0 {
            return Err("stamina rates must be >= 0".to_string());
        }
        if !self.reach_radius.is_finite() || self.reach_radius <= 0.0 {
            return Err("reach_radius must be finite and > 0".to_string());
        }
        if self.serve_offset >= self.reach_radius {
            return Err("serve_offset must be < reach_radius".to_string());
        }
        if self.serve_height >= self.reach_height {
            return Err("serve_height must be < reach_height".to_string());
        }
        Ok(())
    }
}

/// AI opponent tuning
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiConfig {
    /// Delay between seeing an opponent hit and starting to move (seconds)
    pub reaction_time: f64,
    /// Max random yaw added to each shot (degrees)
    pub shot_variation: f64,
    /// Distance to the target at which the AI stops and waits for the ball
    pub shot_decision_radius: f64,
    /// Distance to the neutral spot that ends recovery
    pub recovery_threshold: f64,
    /// Distance to the net under which topspin becomes an option
    pub net_approach_distance: f64,
    /// Depth behind which a lob becomes an option
    pub lob_depth: f64,
    pub anticipation_min: f64,
    pub anticipation_max: f64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            reaction_time: 0.15,
            shot_variation: 10.0,
            shot_decision_radius: 1.5,
            recovery_threshold: 1.0,
            net_approach_distance: 5.0,
            lob_depth: 10.0,
            anticipation_min: 0.5,
            anticipation_max: 1.5,
        }
    }
}

impl AiConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.reaction_time.is_finite() || self.reaction_time < 0.0 {
            return Err("reaction_time must be finite and >= 0".to_string());
        }
        if !self.shot_variation.is_finite() || self.shot_variation < 0.0 {
            return Err("shot_variation must be finite and >= 0".to_string());
        }
        if !self.anticipation_min.is_finite()
            || !self.anticipation_max.is_finite()
            || self.anticipation_max < self.anticipation_min
        {
            return Err("anticipation_max must be >= anticipation_min".to_string());
        }
        Ok(())
    }
}

/// Everything that shapes a match, loadable from JSON.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchConfig {
    pub physics: PhysicsConfig,
    pub shots: ShotConfig,
    pub rally: RallyConfig,
    pub court: CourtConfig,
    pub players: PlayerConfig,
    pub ai: AiConfig,
}

impl MatchConfig {
    /// Parse a (possibly partial) JSON document; missing fields keep defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.physics.validate()?;
        self.shots.validate()?;
        self.rally.validate()?;
        self.court.validate()?;
        self.players.validate()?;
        self.ai.validate()?;
        Ok(())
    }
}
