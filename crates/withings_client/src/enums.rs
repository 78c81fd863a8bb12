//! Closed code spaces used on the wire.
//!
//! Every enum maps both ways between a variant and its wire code. Decoding an
//! unlisted code is an error; none of these enums has a fallback variant.

use crate::ParseError;
use std::fmt;
use std::str::FromStr;

macro_rules! int_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $code:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub const fn code(self) -> i64 {
                match self {
                    $($name::$variant => $code),+
                }
            }

            pub fn from_code(code: i64) -> Result<Self, ParseError> {
                match code {
                    $($code => Ok($name::$variant),)+
                    other => Err(ParseError::UnknownCode {
                        kind: stringify!($name),
                        code: other.to_string(),
                    }),
                }
            }
        }

        impl TryFrom<i64> for $name {
            type Error = ParseError;

            fn try_from(code: i64) -> Result<Self, Self::Error> {
                Self::from_code(code)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> i64 {
                value.code()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.code())
            }
        }
    };
}

macro_rules! str_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $code:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($code => Ok($name::$variant),)+
                    other => Err(ParseError::UnknownCode {
                        kind: stringify!($name),
                        code: other.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

int_enum! {
    pub enum MeasureType {
        Weight = 1,
        Height = 4,
        FatFreeMass = 5,
        FatRatio = 6,
        FatMassWeight = 8,
        DiastolicBloodPressure = 9,
        SystolicBloodPressure = 10,
        HeartRate = 11,
        Temperature = 12,
        Sp02 = 54,
        BodyTemperature = 71,
        SkinTemperature = 73,
        MuscleMass = 76,
        Hydration = 77,
        BoneMass = 88,
        PulseWaveVelocity = 91,
    }
}

int_enum! {
    pub enum MeasureCategory {
        Real = 1,
        UserObjectives = 2,
    }
}

int_enum! {
    /// How a measure group was captured.
    pub enum MeasureGroupAttrib {
        DeviceEntryForUser = 0,
        DeviceEntryForUserAmbiguous = 1,
        ManualUserEntry = 2,
        ManualUserDuringAccountCreation = 4,
        MeasureAuto = 5,
        MeasureUserConfirmed = 7,
        SameAsDeviceEntryForUser = 8,
    }
}

impl MeasureGroupAttrib {
    /// Entries the vendor could not attribute to the user with certainty.
    pub const fn is_ambiguous(self) -> bool {
        matches!(
            self,
            MeasureGroupAttrib::DeviceEntryForUserAmbiguous
                | MeasureGroupAttrib::ManualUserDuringAccountCreation
        )
    }
}

int_enum! {
    pub enum SleepState {
        Awake = 0,
        Light = 1,
        Deep = 2,
        Rem = 3,
    }
}

int_enum! {
    pub enum SleepModel {
        Tracker = 16,
        SleepMonitor = 32,
    }
}

int_enum! {
    /// The `appli` code selecting which data category a notification covers.
    pub enum SubscriptionParameter {
        Weight = 1,
        Circulatory = 4,
        Activity = 16,
        Sleep = 44,
        User = 46,
        BedIn = 50,
        BedOut = 51,
    }
}

str_enum! {
    pub enum ActivityField {
        Steps = "steps",
        Distance = "distance",
        Elevation = "elevation",
        Soft = "soft",
        Moderate = "moderate",
        Intense = "intense",
        Active = "active",
        Calories = "calories",
        TotalCalories = "totalcalories",
        HrAverage = "hr_average",
        HrMin = "hr_min",
        HrMax = "hr_max",
        HrZone0 = "hr_zone_0",
        HrZone1 = "hr_zone_1",
        HrZone2 = "hr_zone_2",
        HrZone3 = "hr_zone_3",
    }
}

str_enum! {
    pub enum SleepField {
        Hr = "hr",
        Rr = "rr",
    }
}

str_enum! {
    pub enum SleepSummaryField {
        RemSleepDuration = "remsleepduration",
        WakeupDuration = "wakeupduration",
        LightSleepDuration = "lightsleepduration",
        DeepSleepDuration = "deepsleepduration",
        WakeupCount = "wakeupcount",
        DurationToSleep = "durationtosleep",
        DurationToWakeup = "durationtowakeup",
        HrAverage = "hr_average",
        HrMin = "hr_min",
        HrMax = "hr_max",
        RrAverage = "rr_average",
        RrMin = "rr_min",
        RrMax = "rr_max",
    }
}

str_enum! {
    /// OAuth2 scopes the user is asked to grant.
    pub enum AuthScope {
        UserInfo = "user.info",
        UserMetrics = "user.metrics",
        UserActivity = "user.activity",
        UserSleepEvents = "user.sleepevents",
    }
}

/// Field name sets that serialize as a comma separated `data_fields` value.
pub trait WireField: Copy {
    fn wire_name(self) -> &'static str;
}

impl WireField for ActivityField {
    fn wire_name(self) -> &'static str {
        self.as_str()
    }
}

impl WireField for SleepField {
    fn wire_name(self) -> &'static str {
        self.as_str()
    }
}

impl WireField for SleepSummaryField {
    fn wire_name(self) -> &'static str {
        self.as_str()
    }
}
