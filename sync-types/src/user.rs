//! User records as served by the "list users" endpoint.
//!
//! Fields the endpoint sends but the screen never reads (username, geo,
//! catch phrases) are ignored on decode.

use serde::{Deserialize, Serialize};

/// A single user record. Identity is `id`; records are never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Stable unique identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone, free-form.
    pub phone: String,
    /// Personal or company website.
    pub website: String,
    /// Employer.
    pub company: Company,
    /// Postal address.
    pub address: Address,
}

/// Employer of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Company name.
    pub name: String,
}

/// Postal address of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Street name.
    pub street: String,
    /// Suite or apartment.
    pub suite: String,
    /// City.
    pub city: String,
    /// Postal code, kept as text (may contain dashes).
    pub zipcode: String,
}

impl UserRecord {
    /// One-line summary used in list rendering.
    pub fn summary(&self) -> String {
        format!("#{} {} <{}> - {}", self.id, self.name, self.email, self.company.name)
    }

    /// Multi-line contact details shown when a single user is opened.
    pub fn contact_card(&self) -> String {
        format!(
            "{}\nEmail: {}\nPhone: {}\nWebsite: {}\nCompany: {}\nAddress: {}",
            self.name,
            self.email,
            self.phone,
            self.website,
            self.company.name,
            self.address,
        )
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {}, {} {}",
            self.street, self.suite, self.city, self.zipcode
        )
    }
}
