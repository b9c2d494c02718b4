//! CRM tables: `leads` and `contact_messages`.

use marom_core::{ContactMessage, Lead};

use crate::store::{Direction, HostedStore, Select, StoreError, decode_rows};

pub const LEADS: &str = "leads";
pub const CONTACT_MESSAGES: &str = "contact_messages";

/// Newsletter sign-ups, newest first.
///
/// # Errors
///
/// Returns the store error, or `Decode` if a row is malformed.
pub async fn newsletter_leads(store: &dyn HostedStore) -> Result<Vec<Lead>, StoreError> {
    let rows = store
        .select(
            LEADS,
            &Select::all()
                .eq("source", Lead::NEWSLETTER)
                .order_by("created_at", Direction::Descending),
        )
        .await?;
    decode_rows(LEADS, rows)
}

/// Contact form messages, newest first.
///
/// # Errors
///
/// `MissingTable` until the table has been created.
pub async fn contact_messages(store: &dyn HostedStore) -> Result<Vec<ContactMessage>, StoreError> {
    let rows = store
        .select(
            CONTACT_MESSAGES,
            &Select::all().order_by("created_at", Direction::Descending),
        )
        .await?;
    decode_rows(CONTACT_MESSAGES, rows)
}
