//! Static capability table keyed by user type.

use serde::Serialize;

use super::session::UserType;

/// A single permission checked by the route gate and the API handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    AccessAdmin,
    AccessSuperadmin,
    CreateHotel,
    ManageRooms,
    ManageBookings,
    ManageGuests,
    ManagePricing,
    ManageWorkers,
    ManageSettings,
    ApproveUsers,
    ApproveProperties,
    ManageCommissions,
}

/// Capabilities granted to a user type. There are no per-user overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleCapabilitySet {
    pub access_admin: bool,
    pub access_superadmin: bool,
    pub create_hotel: bool,
    pub manage_rooms: bool,
    pub manage_bookings: bool,
    pub manage_guests: bool,
    pub manage_pricing: bool,
    pub manage_workers: bool,
    pub manage_settings: bool,
    pub approve_users: bool,
    pub approve_properties: bool,
    pub manage_commissions: bool,
}

const NONE: RoleCapabilitySet = RoleCapabilitySet {
    access_admin: false,
    access_superadmin: false,
    create_hotel: false,
    manage_rooms: false,
    manage_bookings: false,
    manage_guests: false,
    manage_pricing: false,
    manage_workers: false,
    manage_settings: false,
    approve_users: false,
    approve_properties: false,
    manage_commissions: false,
};

impl RoleCapabilitySet {
    pub const fn for_user_type(user_type: UserType) -> Self {
        match user_type {
            UserType::SuperAdmin => RoleCapabilitySet {
                access_superadmin: true,
                approve_users: true,
                approve_properties: true,
                manage_commissions: true,
                manage_pricing: true,
                ..NONE
            },
            UserType::Owner => RoleCapabilitySet {
                access_admin: true,
                create_hotel: true,
                manage_rooms: true,
                manage_bookings: true,
                manage_guests: true,
                manage_pricing: true,
                manage_workers: true,
                manage_settings: true,
                ..NONE
            },
            UserType::Worker => RoleCapabilitySet {
                manage_bookings: true,
                manage_guests: true,
                ..NONE
            },
        }
    }

    pub const fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::AccessAdmin => self.access_admin,
            Capability::AccessSuperadmin => self.access_superadmin,
            Capability::CreateHotel => self.create_hotel,
            Capability::ManageRooms => self.manage_rooms,
            Capability::ManageBookings => self.manage_bookings,
            Capability::ManageGuests => self.manage_guests,
            Capability::ManagePricing => self.manage_pricing,
            Capability::ManageWorkers => self.manage_workers,
            Capability::ManageSettings => self.manage_settings,
            Capability::ApproveUsers => self.approve_users,
            Capability::ApproveProperties => self.approve_properties,
            Capability::ManageCommissions => self.manage_commissions,
        }
    }
}
