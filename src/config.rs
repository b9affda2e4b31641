use embedded_hal::delay::DelayNs;

use crate::bus::BusTransportTrait;

/// Default 7-bit address of a PCF8574T backpack with A0-A2 left open.
pub const DEFAULT_I2C_ADDRESS: u8 = 0x27;
/// Default two-wire bus clock.
pub const DEFAULT_BUS_CLOCK_HZ: u32 = 100_000;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// What `init` does when the expander does not acknowledge the presence probe.
pub enum ProbePolicy {
    /// Probe once and fail immediately.
    #[default]
    FailFast,
    /// Probe up to `1 + retries` times, waiting `backoff_ms` between attempts.
    Retry { retries: u32, backoff_ms: u32 },
    /// Keep probing with `backoff_ms` between attempts until the expander answers.
    /// `init` does not return until it does.
    RetryForever { backoff_ms: u32 },
}

impl ProbePolicy {
    /// Delay before the next probe given that `failed` probes have already been attempted, or
    /// `None` when the policy is exhausted.
    pub(crate) fn backoff_after(&self, failed: u32) -> Option<u32> {
        match *self {
            ProbePolicy::FailFast => None,
            ProbePolicy::Retry {
                retries,
                backoff_ms,
            } => (failed <= retries).then_some(backoff_ms),
            ProbePolicy::RetryForever { backoff_ms } => Some(backoff_ms),
        }
    }
}

/// Hardware binding of one display: the bus it sits on, where it answers, and how to bring the
/// bus up.
pub struct DeviceSetupConfig<BUS, DELAY>
where
    BUS: BusTransportTrait,
    DELAY: DelayNs,
{
    pub(crate) bus: BUS,
    pub(crate) address: u8,
    pub(crate) delay: DELAY,
    pub(crate) clock_hz: u32,
    pub(crate) probe_policy: ProbePolicy,
}

impl<BUS, DELAY> DeviceSetupConfig<BUS, DELAY>
where
    BUS: BusTransportTrait,
    DELAY: DelayNs,
{
    pub fn new(bus: BUS, address: u8, delay: DELAY) -> Self {
        Self {
            bus,
            address,
            delay,
            clock_hz: DEFAULT_BUS_CLOCK_HZ,
            probe_policy: ProbePolicy::default(),
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn clock_hz(&self) -> u32 {
        self.clock_hz
    }

    pub fn probe_policy(&self) -> ProbePolicy {
        self.probe_policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fail_fast_never_backs_off() {
        assert_eq!(ProbePolicy::default(), ProbePolicy::FailFast);
        assert_eq!(ProbePolicy::FailFast.backoff_after(1), None);
    }

    #[test]
    fn test_bounded_retry_backoff() {
        let policy = ProbePolicy::Retry {
            retries: 2,
            backoff_ms: 250,
        };
        assert_eq!(policy.backoff_after(1), Some(250));
        assert_eq!(policy.backoff_after(2), Some(250));
        assert_eq!(policy.backoff_after(3), None);

        let zero = ProbePolicy::Retry {
            retries: 0,
            backoff_ms: 250,
        };
        assert_eq!(zero.backoff_after(1), None);
    }

    #[test]
    fn test_retry_forever_backoff() {
        let policy = ProbePolicy::RetryForever { backoff_ms: 1000 };
        assert_eq!(policy.backoff_after(1), Some(1000));
        assert_eq!(policy.backoff_after(u32::MAX), Some(1000));
    }
}
