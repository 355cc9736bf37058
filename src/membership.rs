//! Luxe Membership

/// Membership flags read from the signed-in user's profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Membership {
    /// Whether the user holds an active Luxe membership.
    pub is_luxe_member: bool,

    /// Free gift wraps remaining on the membership.
    pub gift_wraps_left: u32,
}

impl Membership {
    /// A regular, non-member customer.
    pub const fn standard() -> Self {
        Self {
            is_luxe_member: false,
            gift_wraps_left: 0,
        }
    }

    /// A Luxe member with the given number of free gift wraps left.
    pub const fn luxe(gift_wraps_left: u32) -> Self {
        Self {
            is_luxe_member: true,
            gift_wraps_left,
        }
    }

    /// Free gift wrap applies while the member still has wraps left.
    pub const fn luxe_benefit_active(&self) -> bool {
        self.is_luxe_member && self.gift_wraps_left > 0
    }

    /// Use one free gift wrap. Returns `false` when no benefit was available.
    pub fn consume_gift_wrap(&mut self) -> bool {
        if !self.luxe_benefit_active() {
            return false;
        }

        self.gift_wraps_left -= 1;

        true
    }
}
