use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::inventory::pool::PoolEntry;
use crate::domain::order::aggregate::Order;

use super::{ConsumeLine, InventoryStore, OrderStore, StoreError};

// ============================================================================
// In-Memory Store
// ============================================================================
//
// Reference implementation of the store traits. A single write lock per map
// gives the atomicity the trait contract demands: a consume either applies
// every line or none, and order updates are compare-and-set on version.
//
// ============================================================================

#[derive(Default)]
pub struct InMemoryStore {
    orders: RwLock<HashMap<Uuid, Order>>,
    pool: RwLock<HashMap<Uuid, PoolEntry>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(entry: &PoolEntry, part_name: &str, location: Option<&str>) -> bool {
        entry.part_name == part_name && location.map_or(true, |loc| entry.location == loc)
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn insert(&self, order: Order) -> Result<(), StoreError> {
        self.orders.write().await.insert(order.id, order);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Order>, StoreError> {
        let mut orders: Vec<Order> = self.orders.read().await.values().cloned().collect();
        orders.sort_by_key(|o| (o.created_at, o.id));
        Ok(orders)
    }

    async fn update(&self, expected_version: i64, order: Order) -> Result<(), StoreError> {
        let mut orders = self.orders.write().await;
        let current = orders
            .get(&order.id)
            .ok_or(StoreError::OrderNotFound(order.id))?;

        if current.version != expected_version {
            return Err(StoreError::VersionConflict {
                id: order.id,
                expected: expected_version,
                actual: current.version,
            });
        }

        orders.insert(order.id, order);
        Ok(())
    }
}

#[async_trait]
impl InventoryStore for InMemoryStore {
    async fn insert_entry(&self, entry: PoolEntry) -> Result<(), StoreError> {
        self.pool.write().await.insert(entry.id, entry);
        Ok(())
    }

    async fn entries_for_part(
        &self,
        part_name: &str,
        location: Option<&str>,
    ) -> Result<Vec<PoolEntry>, StoreError> {
        let pool = self.pool.read().await;
        let mut entries: Vec<PoolEntry> = pool
            .values()
            .filter(|e| Self::matches(e, part_name, location))
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.id);
        Ok(entries)
    }

    async fn consume_exact(
        &self,
        lines: &[ConsumeLine],
        location: Option<&str>,
    ) -> Result<(), StoreError> {
        let mut pool = self.pool.write().await;

        // Verify every line against live availability before touching
        // anything, so the whole request stays all-or-nothing.
        for line in lines {
            let actual: u32 = pool
                .values()
                .filter(|e| Self::matches(e, &line.part_name, location))
                .map(|e| e.quantity_on_hand)
                .sum();

            if actual != line.expected_available {
                return Err(StoreError::AvailabilityChanged {
                    part_name: line.part_name.clone(),
                    expected: line.expected_available,
                    actual,
                });
            }
        }

        for line in lines {
            let mut entry_ids: Vec<Uuid> = pool
                .values()
                .filter(|e| Self::matches(e, &line.part_name, location))
                .map(|e| e.id)
                .collect();
            entry_ids.sort();

            let mut remaining = line.quantity;
            for id in entry_ids {
                if remaining == 0 {
                    break;
                }
                let entry = pool.get_mut(&id).expect("entry id collected above");
                let take = remaining.min(entry.quantity_on_hand);
                entry.quantity_on_hand -= take;
                remaining -= take;
            }
            // expected_available was verified above, so the line drained
            debug_assert_eq!(remaining, 0);
        }

        Ok(())
    }

    async fn credit_exact(
        &self,
        lines: &[ConsumeLine],
        location: Option<&str>,
    ) -> Result<(), StoreError> {
        let mut pool = self.pool.write().await;

        for line in lines {
            let mut entry_ids: Vec<Uuid> = pool
                .values()
                .filter(|e| Self::matches(e, &line.part_name, location))
                .map(|e| e.id)
                .collect();
            entry_ids.sort();

            match entry_ids.first() {
                Some(id) => {
                    let entry = pool.get_mut(id).expect("entry id collected above");
                    entry.quantity_on_hand += line.quantity;
                }
                None => {
                    let entry = PoolEntry::new(
                        line.part_name.as_str(),
                        location.unwrap_or("unspecified"),
                        line.quantity,
                    );
                    pool.insert(entry.id, entry);
                }
            }
        }

        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::value_objects::{LineItem, OrderType, Stage};
    use chrono::NaiveDate;

    fn sample_order() -> Order {
        Order::create(
            OrderType::Spare,
            vec![LineItem::new("bolt", 3)],
            None,
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            None,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_update_with_stale_version_conflicts() {
        let store = InMemoryStore::new();
        let mut order = sample_order();
        let id = order.id;
        store.insert(order.clone()).await.unwrap();

        order.apply_stage(Stage::WarehouseCollected);
        store.update(0, order.clone()).await.unwrap();

        // A second writer holding the old version must lose.
        let mut stale = store.get(id).await.unwrap().unwrap();
        stale.version = 0;
        stale.apply_stage(Stage::ReadyForDispatch);
        let err = store.update(0, stale).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::VersionConflict {
                id,
                expected: 0,
                actual: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_entries_for_part_sorted_and_scoped() {
        let store = InMemoryStore::new();
        store
            .insert_entry(PoolEntry::new("bolt", "east", 5))
            .await
            .unwrap();
        store
            .insert_entry(PoolEntry::new("bolt", "west", 7))
            .await
            .unwrap();
        store
            .insert_entry(PoolEntry::new("washer", "east", 9))
            .await
            .unwrap();

        let all = store.entries_for_part("bolt", None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.windows(2).all(|w| w[0].id <= w[1].id));

        let east = store.entries_for_part("bolt", Some("east")).await.unwrap();
        assert_eq!(east.len(), 1);
        assert_eq!(east[0].quantity_on_hand, 5);
    }

    #[tokio::test]
    async fn test_consume_drains_entries_in_id_order() {
        let store = InMemoryStore::new();
        let a = PoolEntry::new("bolt", "east", 2);
        let b = PoolEntry::new("bolt", "east", 4);
        store.insert_entry(a.clone()).await.unwrap();
        store.insert_entry(b.clone()).await.unwrap();

        store
            .consume_exact(
                &[ConsumeLine {
                    part_name: "bolt".to_string(),
                    quantity: 5,
                    expected_available: 6,
                }],
                None,
            )
            .await
            .unwrap();

        let entries = store.entries_for_part("bolt", None).await.unwrap();
        let total: u32 = entries.iter().map(|e| e.quantity_on_hand).sum();
        assert_eq!(total, 1);

        // The lower entry id drains first.
        let (first, second) = if a.id < b.id { (a.id, b.id) } else { (b.id, a.id) };
        let first_qty = entries.iter().find(|e| e.id == first).unwrap().quantity_on_hand;
        let second_qty = entries
            .iter()
            .find(|e| e.id == second)
            .unwrap()
            .quantity_on_hand;
        assert_eq!(first_qty, 0);
        assert_eq!(second_qty, 1);
    }

    #[tokio::test]
    async fn test_credit_restores_onto_lowest_entry_id() {
        let store = InMemoryStore::new();
        let a = PoolEntry::new("bolt", "east", 2);
        let b = PoolEntry::new("bolt", "east", 4);
        store.insert_entry(a.clone()).await.unwrap();
        store.insert_entry(b.clone()).await.unwrap();

        let line = ConsumeLine {
            part_name: "bolt".to_string(),
            quantity: 5,
            expected_available: 6,
        };
        store.consume_exact(&[line.clone()], None).await.unwrap();
        store.credit_exact(&[line], None).await.unwrap();

        let entries = store.entries_for_part("bolt", None).await.unwrap();
        let total: u32 = entries.iter().map(|e| e.quantity_on_hand).sum();
        assert_eq!(total, 6);

        let first = if a.id < b.id { a.id } else { b.id };
        let first_qty = entries.iter().find(|e| e.id == first).unwrap().quantity_on_hand;
        assert_eq!(first_qty, 5);
    }

    #[tokio::test]
    async fn test_consume_aborts_whole_request_on_stale_availability() {
        let store = InMemoryStore::new();
        store
            .insert_entry(PoolEntry::new("bolt", "east", 5))
            .await
            .unwrap();
        store
            .insert_entry(PoolEntry::new("washer", "east", 3))
            .await
            .unwrap();

        let err = store
            .consume_exact(
                &[
                    ConsumeLine {
                        part_name: "washer".to_string(),
                        quantity: 1,
                        expected_available: 3,
                    },
                    ConsumeLine {
                        part_name: "bolt".to_string(),
                        quantity: 2,
                        expected_available: 4, // stale snapshot
                    },
                ],
                None,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::AvailabilityChanged { .. }));

        // Nothing moved, including the washer line listed first.
        let washers = store.entries_for_part("washer", None).await.unwrap();
        assert_eq!(washers[0].quantity_on_hand, 3);
    }
}
