//! Known OBD-II metric fields and how each one is rendered.

use std::fmt;

/// A metric field the dashboard has a display slot for.
///
/// Field names match the JSON keys the sender emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricName {
    Rpm,
    Speed,
    CoolantTemp,
    EngineLoad,
    FuelLevel,
    ThrottlePos,
    MafAirFlow,
    Mpg,
    BatteryVoltage,
    Soc,
    Acceleration,
    TripDistance,
    IdlingTime,
    Dtc,
    IgnitionState,
}

/// How a field's value is interpreted before display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Fixed-point number with the given fractional digits
    Gauge { decimals: usize },
    /// Elapsed seconds shown as `HH:MM:SS`
    Duration,
    /// Diagnostic trouble code
    TroubleCode,
    /// Off/On/Running label
    Ignition,
}

impl MetricName {
    /// Every known metric in display order.
    pub const ALL: [MetricName; 15] = [
        MetricName::Rpm,
        MetricName::Speed,
        MetricName::CoolantTemp,
        MetricName::EngineLoad,
        MetricName::FuelLevel,
        MetricName::ThrottlePos,
        MetricName::MafAirFlow,
        MetricName::Mpg,
        MetricName::BatteryVoltage,
        MetricName::Soc,
        MetricName::Acceleration,
        MetricName::TripDistance,
        MetricName::IdlingTime,
        MetricName::Dtc,
        MetricName::IgnitionState,
    ];

    /// JSON key (and page element id) for this metric.
    pub fn key(&self) -> &'static str {
        match self {
            MetricName::Rpm => "rpm",
            MetricName::Speed => "speed",
            MetricName::CoolantTemp => "coolantTemp",
            MetricName::EngineLoad => "engineLoad",
            MetricName::FuelLevel => "fuelLevel",
            MetricName::ThrottlePos => "throttlePos",
            MetricName::MafAirFlow => "mafAirFlow",
            MetricName::Mpg => "mpg",
            MetricName::BatteryVoltage => "batteryVoltage",
            MetricName::Soc => "soc",
            MetricName::Acceleration => "acceleration",
            MetricName::TripDistance => "tripDistance",
            MetricName::IdlingTime => "idlingTime",
            MetricName::Dtc => "dtc",
            MetricName::IgnitionState => "ignitionState",
        }
    }

    /// Look up a metric by its JSON key. Unknown keys return `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|name| name.key() == key)
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            MetricName::Acceleration | MetricName::TripDistance => {
                FieldKind::Gauge { decimals: 2 }
            }
            MetricName::IdlingTime => FieldKind::Duration,
            MetricName::Dtc => FieldKind::TroubleCode,
            MetricName::IgnitionState => FieldKind::Ignition,
            _ => FieldKind::Gauge { decimals: 1 },
        }
    }

    /// Human-readable card title.
    pub fn label(&self) -> &'static str {
        match self {
            MetricName::Rpm => "Engine RPM",
            MetricName::Speed => "Speed",
            MetricName::CoolantTemp => "Coolant Temp",
            MetricName::EngineLoad => "Engine Load",
            MetricName::FuelLevel => "Fuel Level",
            MetricName::ThrottlePos => "Throttle",
            MetricName::MafAirFlow => "MAF Air Flow",
            MetricName::Mpg => "Fuel Economy",
            MetricName::BatteryVoltage => "Battery",
            MetricName::Soc => "State of Charge",
            MetricName::Acceleration => "Acceleration",
            MetricName::TripDistance => "Trip Distance",
            MetricName::IdlingTime => "Idling Time",
            MetricName::Dtc => "Trouble Codes",
            MetricName::IgnitionState => "Ignition",
        }
    }

    /// Unit suffix, empty for unitless fields.
    pub fn unit(&self) -> &'static str {
        match self {
            MetricName::Rpm => "rpm",
            MetricName::Speed => "km/h",
            MetricName::CoolantTemp => "°C",
            MetricName::EngineLoad
            | MetricName::FuelLevel
            | MetricName::ThrottlePos
            | MetricName::Soc => "%",
            MetricName::MafAirFlow => "g/s",
            MetricName::Mpg => "mpg",
            MetricName::BatteryVoltage => "V",
            MetricName::Acceleration => "m/s²",
            MetricName::TripDistance => "km",
            MetricName::IdlingTime | MetricName::Dtc | MetricName::IgnitionState => "",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
