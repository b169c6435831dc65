use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Config,
    LogEvent,
    SetScreenName,
    SetUserProperty,
    SetUserId,
    SetDefaultParameters,
    SetConsent,
    ResetAnalyticsData,
    InitiateConversionMeasurement,
}

impl Command {
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "config" => Some(Self::Config),
            "logevent" => Some(Self::LogEvent),
            "setscreenname" => Some(Self::SetScreenName),
            "setuserproperty" => Some(Self::SetUserProperty),
            "setuserid" => Some(Self::SetUserId),
            "setdefaultparameters" => Some(Self::SetDefaultParameters),
            "setconsent" => Some(Self::SetConsent),
            "resetanalyticsdata" => Some(Self::ResetAnalyticsData),
            "initiateconversionmeasurement" => Some(Self::InitiateConversionMeasurement),
            _ => None,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::LogEvent => "logevent",
            Self::SetScreenName => "setscreenname",
            Self::SetUserProperty => "setuserproperty",
            Self::SetUserId => "setuserid",
            Self::SetDefaultParameters => "setdefaultparameters",
            Self::SetConsent => "setconsent",
            Self::ResetAnalyticsData => "resetanalyticsdata",
            Self::InitiateConversionMeasurement => "initiateconversionmeasurement",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Splits a command field into trimmed, non-blank tokens in payload order.
pub fn split_command_tokens(value: &str, separator: char) -> Vec<String> {
    value
        .split(separator)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
