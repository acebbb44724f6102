use atat::AtatResp;

/// Whether the `+CLCC` listing showed our call in the queried state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CallStatus {
    pub in_state: bool,
}

impl AtatResp for CallStatus {}
