//! Simulated OBD-II drive cycle.
//!
//! Produces one metrics sample per tick. The values are plausible rather
//! than physical: a smoothed random throttle drives RPM and speed, and the
//! rest follows from those.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Trouble codes the simulator raises now and then.
const TROUBLE_CODES: [&str; 4] = ["P0300", "P0171", "P0420", "P0128"];

/// Coolant temperature the engine warms toward, °C.
const OPERATING_TEMP: f64 = 90.0;

/// Connection-state tag to announce in each sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FeedMode {
    Demo,
    Connected,
}

/// One metrics message in the sender's wire shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObdSample {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub rpm: Option<f64>,
    pub speed: Option<f64>,
    pub coolant_temp: Option<f64>,
    pub engine_load: Option<f64>,
    pub fuel_level: Option<f64>,
    pub throttle_pos: Option<f64>,
    pub maf_air_flow: Option<f64>,
    pub mpg: Option<f64>,
    pub battery_voltage: Option<f64>,
    pub soc: Option<f64>,
    pub acceleration: Option<f64>,
    pub trip_distance: Option<f64>,
    pub idling_time: Option<u64>,
    pub dtc: Option<String>,
    pub ignition_state: Option<&'static str>,
}

impl ObdSample {
    /// Status-only message announcing a lost adapter.
    pub fn dropout(error: &str) -> Self {
        Self {
            status: "disconnected",
            error: Some(error.to_string()),
            rpm: None,
            speed: None,
            coolant_temp: None,
            engine_load: None,
            fuel_level: None,
            throttle_pos: None,
            maf_air_flow: None,
            mpg: None,
            battery_voltage: None,
            soc: None,
            acceleration: None,
            trip_distance: None,
            idling_time: None,
            dtc: None,
            ignition_state: None,
        }
    }
}

/// Drive-cycle state advanced once per tick.
#[derive(Debug)]
pub struct DriveSimulator {
    rng: StdRng,
    mode: FeedMode,
    throttle: f64,
    speed_kmh: f64,
    coolant_c: f64,
    fuel_pct: f64,
    trip_km: f64,
    idle_secs: f64,
    dtc: Option<&'static str>,
}

impl DriveSimulator {
    pub fn new(mode: FeedMode, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng,
            mode,
            throttle: 0.0,
            speed_kmh: 0.0,
            coolant_c: 25.0,
            fuel_pct: 75.0,
            trip_km: 0.0,
            idle_secs: 0.0,
            dtc: None,
        }
    }

    /// Advance by `dt` seconds and return the new sample.
    pub fn step(&mut self, dt: f64) -> ObdSample {
        // Throttle: smoothed random walk, sometimes back to idle
        let target = if self.rng.random_bool(0.1) {
            0.0
        } else {
            self.rng.random_range(0.0..70.0)
        };
        self.throttle += (target - self.throttle) * 0.2;
        self.throttle = self.throttle.clamp(0.0, 100.0);

        let target_speed = self.throttle * 1.8;
        let previous_speed = self.speed_kmh;
        self.speed_kmh += (target_speed - self.speed_kmh) * (0.5 * dt).min(1.0);
        self.speed_kmh = self.speed_kmh.max(0.0);
        let acceleration = if dt > 0.0 {
            (self.speed_kmh - previous_speed) / 3.6 / dt
        } else {
            0.0
        };

        let rpm = 750.0 + self.throttle * 45.0 + self.rng.random_range(-15.0..15.0);
        let engine_load = (self.throttle * 0.9 + 15.0).min(100.0);
        let maf = rpm * engine_load / 100.0 * 0.01 + 2.0;

        self.coolant_c += (OPERATING_TEMP - self.coolant_c) * (0.02 * dt).min(1.0);
        self.fuel_pct = (self.fuel_pct - maf * dt * 0.0005).max(0.0);
        self.trip_km += self.speed_kmh * dt / 3600.0;
        if self.speed_kmh < 1.0 {
            self.idle_secs += dt;
        }

        let mpg = if self.speed_kmh < 1.0 {
            0.0
        } else {
            // 14.7 AFR, 740 g/L gasoline, 3.785 L/gal
            let gallons_per_hour = maf / 14.7 / 740.0 / 3.785 * 3600.0;
            let mph = self.speed_kmh * 0.621_371;
            (mph / gallons_per_hour).min(99.0)
        };

        self.update_dtc();

        ObdSample {
            status: match self.mode {
                FeedMode::Demo => "demo",
                FeedMode::Connected => "connected",
            },
            error: None,
            rpm: Some(rpm),
            speed: Some(self.speed_kmh),
            coolant_temp: Some(self.coolant_c),
            engine_load: Some(engine_load),
            fuel_level: Some(self.fuel_pct),
            throttle_pos: Some(self.throttle),
            maf_air_flow: Some(maf),
            mpg: Some(mpg),
            battery_voltage: Some(13.8 + self.rng.random_range(-0.2..0.2)),
            soc: Some(80.0 + self.rng.random_range(-1.0..1.0)),
            acceleration: Some(acceleration),
            trip_distance: Some(self.trip_km),
            idling_time: Some(self.idle_secs as u64),
            dtc: Some(self.dtc.unwrap_or("None").to_string()),
            ignition_state: Some("Running"),
        }
    }

    fn update_dtc(&mut self) {
        match self.dtc {
            None if self.rng.random_bool(0.01) => {
                let code = TROUBLE_CODES[self.rng.random_range(0..TROUBLE_CODES.len())];
                self.dtc = Some(code);
            }
            Some(_) if self.rng.random_bool(0.05) => self.dtc = None,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_runs_repeat() {
        let mut a = DriveSimulator::new(FeedMode::Demo, Some(42));
        let mut b = DriveSimulator::new(FeedMode::Demo, Some(42));
        for _ in 0..50 {
            assert_eq!(a.step(0.2), b.step(0.2));
        }
    }

    #[test]
    fn test_values_stay_in_range() {
        let mut sim = DriveSimulator::new(FeedMode::Connected, Some(7));
        let mut last_trip = 0.0;
        for _ in 0..2000 {
            let sample = sim.step(0.2);
            assert_eq!(sample.status, "connected");
            let rpm = sample.rpm.unwrap();
            assert!((700.0..=6000.0).contains(&rpm), "rpm {rpm}");
            assert!(sample.speed.unwrap() >= 0.0);
            assert!((0.0..=100.0).contains(&sample.fuel_level.unwrap()));
            assert!(sample.coolant_temp.unwrap() <= OPERATING_TEMP);
            let trip = sample.trip_distance.unwrap();
            assert!(trip >= last_trip);
            last_trip = trip;
        }
    }

    #[test]
    fn test_wire_shape_uses_camel_case() {
        let mut sim = DriveSimulator::new(FeedMode::Demo, Some(1));
        let value = serde_json::to_value(sim.step(0.2)).unwrap();
        let object = value.as_object().unwrap();
        for key in ["coolantTemp", "idlingTime", "ignitionState", "tripDistance", "status"] {
            assert!(object.contains_key(key), "missing {key}");
        }
        assert!(!object.contains_key("error"));
    }

    #[test]
    fn test_dropout_carries_error() {
        let value = serde_json::to_value(ObdSample::dropout("adapter lost")).unwrap();
        assert_eq!(value["status"], "disconnected");
        assert_eq!(value["error"], "adapter lost");
        assert!(value["rpm"].is_null());
    }
}
