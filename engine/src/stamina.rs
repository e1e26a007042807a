use tennis_shared::config::PlayerConfig;

/// Sprint budget. Drains while sprinting, refills otherwise.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stamina {
    pub max: f64,
    pub current: f64,
    regen_rate: f64,
    depletion_rate: f64,
}

impl Stamina {
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            max: config.max_stamina,
            current: config.max_stamina,
            regen_rate: config.stamina_regen_rate,
            depletion_rate: config.stamina_depletion_rate,
        }
    }

    pub fn update(&mut self, dt: f64, depleting: bool) {
        if depleting {
            self.current = (self.current - self.depletion_rate * dt).max(0.0);
        } else {
            self.current = (self.current + self.regen_rate * dt).min(self.max);
        }
    }

    pub fn can_perform(&self, required: f64) -> bool {
        self.current >= required
    }

    pub fn is_empty(&self) -> bool {
        self.current <= 0.0
    }

    pub fn fraction(&self) -> f64 {
        self.current / self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_full() {
        let stamina = Stamina::new(&PlayerConfig::default());
        assert_eq!(stamina.current, 100.0);
        assert_eq!(stamina.fraction(), 1.0);
    }

    #[test]
    fn depletes_and_floors_at_zero() {
        let mut stamina = Stamina::new(&PlayerConfig::default());
        stamina.update(1.0, true);
        assert_eq!(stamina.current, 80.0);
        assert!(stamina.can_perform(50.0));

        stamina.update(10.0, true);
        assert_eq!(stamina.current, 0.0);
        assert!(stamina.is_empty());
    }

    #[test]
    fn regenerates_up_to_max() {
        let mut stamina = Stamina::new(&PlayerConfig::default());
        stamina.update(2.0, true);
        stamina.update(1.0, false);
        assert_eq!(stamina.current, 70.0);

        stamina.update(100.0, false);
        assert_eq!(stamina.current, 100.0);
    }
}
