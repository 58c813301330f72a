//! Reservation domain service.
//!
//! Validates reservations, persists them as full item replacements in the
//! tenant partition and lists them page by page with opaque cursors.
//! Lifecycle events go to a [`ReservationObserver`].

use aviator_core::cursor::{cursor_from_last_evaluated_key, exclusive_start_key, CursorError};
use aviator_core::keys::{reservation_sk_prefix, tenant_pk, PK};
use aviator_core::reservation::{
    item_to_reservation, reservation_key, reservation_to_item, validate_create, validate_replace,
    validate_times, ListReservations, Operation, Reservation, ReservationError, ReservationEvent,
    ReservationObserver, ReservationPage, Result, TenantId,
};
use aviator_core::storage::{AttrValue, KvBackend, QueryInput, SortKeyCondition};
use ulid::Ulid;

use crate::store::KvStore;

/// Reservation operations for any tenant.
pub struct ReservationService<B, O> {
    store: KvStore<B>,
    observer: O,
}

impl<B: KvBackend, O: ReservationObserver> ReservationService<B, O> {
    pub fn new(store: KvStore<B>, observer: O) -> Self {
        Self { store, observer }
    }

    pub fn store(&self) -> &KvStore<B> {
        &self.store
    }

    /// Creates the reservation when it has no id yet, replaces it otherwise.
    pub async fn create_or_update(
        &self,
        tenant: &TenantId,
        reservation: Reservation,
    ) -> Result<Reservation> {
        if reservation.is_new() {
            self.create(tenant, reservation).await
        } else {
            self.replace(tenant, reservation).await
        }
    }

    /// Validates and stores a new reservation under a freshly generated id.
    ///
    /// Any id carried by the input is discarded.
    pub async fn create(
        &self,
        tenant: &TenantId,
        mut reservation: Reservation,
    ) -> Result<Reservation> {
        validate_create(&reservation, self.store.instant())
            .map_err(|error| self.rejected(tenant, Operation::Create, error))?;

        reservation.id = Ulid::new().to_string();
        let timestamps = self
            .store
            .put(reservation_to_item(tenant, &reservation))
            .await?;

        reservation.created_at = Some(timestamps.created_at);
        reservation.updated_at = Some(timestamps.updated_at);

        self.observer.observe(&ReservationEvent::Created {
            tenant,
            id: &reservation.id,
        });
        Ok(reservation)
    }

    /// Replaces a stored reservation with the submitted one.
    ///
    /// This is a full overwrite: fields the caller leaves out are not merged
    /// from the stored version. Only the creation time is carried over.
    pub async fn replace(
        &self,
        tenant: &TenantId,
        mut reservation: Reservation,
    ) -> Result<Reservation> {
        validate_times(&reservation)
            .map_err(|error| self.rejected(tenant, Operation::Replace, error))?;

        if reservation.is_new() {
            return Err(ReservationError::not_found(reservation.id));
        }
        let key = reservation_key(tenant, &reservation.id);
        let stored = match self.store.get(&key).await? {
            Some(item) => item_to_reservation(&item)?,
            None => return Err(ReservationError::not_found(reservation.id)),
        };

        validate_replace(&reservation, stored.end_time, self.store.instant())
            .map_err(|error| self.rejected(tenant, Operation::Replace, error))?;

        let created_at = stored.created_at.unwrap_or_else(|| self.store.now());
        let timestamps = self
            .store
            .replace(reservation_to_item(tenant, &reservation), created_at)
            .await?;

        reservation.created_at = Some(timestamps.created_at);
        reservation.updated_at = Some(timestamps.updated_at);

        self.observer.observe(&ReservationEvent::Replaced {
            tenant,
            id: &reservation.id,
        });
        Ok(reservation)
    }

    /// Looks a reservation up by id.
    pub async fn get(&self, tenant: &TenantId, id: &str) -> Result<Reservation> {
        let item = self
            .store
            .get(&reservation_key(tenant, id))
            .await?
            .ok_or_else(|| ReservationError::not_found(id))?;
        let reservation = item_to_reservation(&item)?;

        self.observer
            .observe(&ReservationEvent::Retrieved { tenant, id });
        Ok(reservation)
    }

    /// Lists one page of a tenant's reservations in ascending id order.
    ///
    /// A page without `next_token` is the last one.
    pub async fn list(
        &self,
        tenant: &TenantId,
        params: &ListReservations,
    ) -> Result<ReservationPage> {
        let partition = tenant_pk(tenant.as_str());

        let start = exclusive_start_key(params.next_token.as_deref())?;
        if let Some(start) = &start {
            if start.get(PK).and_then(AttrValue::as_s) != Some(partition.as_str()) {
                return Err(CursorError::InvalidContent(
                    "token does not belong to this tenant".to_string(),
                )
                .into());
            }
        }

        let input = QueryInput::partition(partition)
            .sort(SortKeyCondition::BeginsWith(
                reservation_sk_prefix().to_string(),
            ))
            .limit(params.limit.filter(|limit| *limit > 0))
            .start_after(start);

        let page = self.store.query(&input).await?;
        let results = page
            .items
            .iter()
            .map(item_to_reservation)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let next_token = cursor_from_last_evaluated_key(page.last_evaluated_key.as_ref())?;

        self.observer.observe(&ReservationEvent::Listed {
            tenant,
            count: results.len(),
            has_next_page: next_token.is_some(),
        });
        Ok(ReservationPage {
            next_token,
            results,
        })
    }

    /// Deletes a reservation. Deleting an unknown id succeeds.
    pub async fn delete(&self, tenant: &TenantId, id: &str) -> Result<()> {
        self.store.delete(&reservation_key(tenant, id)).await?;

        self.observer
            .observe(&ReservationEvent::Deleted { tenant, id });
        Ok(())
    }

    fn rejected(
        &self,
        tenant: &TenantId,
        operation: Operation,
        error: ReservationError,
    ) -> ReservationError {
        self.observer.observe(&ReservationEvent::ValidationFailed {
            tenant,
            operation,
            error: &error,
        });
        error
    }
}
