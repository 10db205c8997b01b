// ── Reactive paginated entity list ──
//
// Ordered storage for one page of server results with push-based change
// notification via `watch`. Server order is preserved; upserts patch in
// place so a row keeps its position after a mutation.

use std::cmp::Ordering;
use std::sync::{Arc, PoisonError, RwLock};

use indexmap::IndexMap;
use tokio::sync::watch;

use libseat_api::models::{
    AdminProfile, Book, BookReservation, EntityId, Event, EventRegistration, Floor, Library,
    LibraryApplication, Notification, Page, Seat, SeatBooking, Section, Subscription,
    SubscriptionPlan, User, total_pages,
};

/// Anything with a server-assigned identifier.
pub trait Entity: Clone + Send + Sync + 'static {
    fn entity_id(&self) -> &EntityId;
}

macro_rules! impl_entity {
    ($($ty:ty),* $(,)?) => {
        $(impl Entity for $ty {
            fn entity_id(&self) -> &EntityId {
                &self.id
            }
        })*
    };
}

impl_entity!(
    AdminProfile,
    Book,
    BookReservation,
    Event,
    EventRegistration,
    Floor,
    Library,
    LibraryApplication,
    Notification,
    Seat,
    SeatBooking,
    Section,
    Subscription,
    SubscriptionPlan,
    User,
);

#[derive(Debug)]
struct ListState<T> {
    items: IndexMap<EntityId, Arc<T>>,
    /// Total matching rows on the server, across all pages.
    count: u64,
    page: u32,
    page_size: u32,
}

pub struct EntityList<T: Entity> {
    state: RwLock<ListState<T>>,
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
}

impl<T: Entity> EntityList<T> {
    pub fn new(page_size: u32) -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            state: RwLock::new(ListState {
                items: IndexMap::new(),
                count: 0,
                page: 1,
                page_size,
            }),
            snapshot,
        }
    }

    /// Replace the contents with one page of server results.
    pub fn replace_page(&self, page: Page<T>, page_number: u32) {
        self.replace_page_sized(page, page_number, None);
    }

    /// Like [`replace_page`](Self::replace_page), recording the page size
    /// the server paged with. `None` keeps the current size.
    pub fn replace_page_sized(&self, page: Page<T>, page_number: u32, page_size: Option<u32>) {
        {
            let mut state = self.write();
            if let Some(size) = page_size.filter(|s| *s > 0) {
                state.page_size = size;
            }
            state.items = page
                .results
                .into_iter()
                .map(|e| (e.entity_id().clone(), Arc::new(e)))
                .collect();
            state.count = page.count;
            state.page = page_number.max(1);
        }
        self.rebuild_snapshot();
    }

    /// Replace the contents with an unpaginated list.
    pub fn replace_all(&self, items: Vec<T>) {
        let count = u64::try_from(items.len()).unwrap_or(u64::MAX);
        self.replace_page(
            Page {
                count,
                next: None,
                previous: None,
                results: items,
            },
            1,
        );
    }

    /// Insert or patch an entity. Existing rows keep their position.
    /// Returns `true` if the entity was new.
    pub fn upsert(&self, entity: T) -> bool {
        let is_new = {
            let mut state = self.write();
            let id = entity.entity_id().clone();
            let is_new = state.items.insert(id, Arc::new(entity)).is_none();
            if is_new {
                state.count += 1;
            }
            is_new
        };
        self.rebuild_snapshot();
        is_new
    }

    /// Remove an entity, preserving the order of the rest.
    pub fn remove(&self, id: &EntityId) -> Option<Arc<T>> {
        let removed = {
            let mut state = self.write();
            let removed = state.items.shift_remove(id);
            if removed.is_some() {
                state.count = state.count.saturating_sub(1);
            }
            removed
        };
        if removed.is_some() {
            self.rebuild_snapshot();
        }
        removed
    }

    pub fn get(&self, id: &EntityId) -> Option<Arc<T>> {
        self.read().items.get(id).cloned()
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.read().items.contains_key(id)
    }

    pub fn clear(&self) {
        {
            let mut state = self.write();
            state.items.clear();
            state.count = 0;
            state.page = 1;
        }
        self.rebuild_snapshot();
    }

    /// Current rows in server order (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    /// Rows kept by `keep`, in server order.
    pub fn filtered(&self, keep: impl Fn(&T) -> bool) -> Vec<Arc<T>> {
        self.read()
            .items
            .values()
            .filter(|e| keep(e))
            .cloned()
            .collect()
    }

    /// Rows in a caller-chosen order. The stored order is untouched.
    pub fn sorted_by(&self, mut cmp: impl FnMut(&T, &T) -> Ordering) -> Vec<Arc<T>> {
        let mut rows: Vec<Arc<T>> = self.read().items.values().cloned().collect();
        rows.sort_by(|a, b| cmp(a, b));
        rows
    }

    pub fn len(&self) -> usize {
        self.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().items.is_empty()
    }

    /// Server-reported total across all pages.
    pub fn count(&self) -> u64 {
        self.read().count
    }

    pub fn current_page(&self) -> u32 {
        self.read().page
    }

    pub fn page_size(&self) -> u32 {
        self.read().page_size
    }

    pub fn total_pages(&self) -> u64 {
        let state = self.read();
        total_pages(state.count, state.page_size)
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn read(&self) -> std::sync::RwLockReadGuard<'_, ListState<T>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, ListState<T>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn rebuild_snapshot(&self) {
        let values: Vec<Arc<T>> = self.read().items.values().cloned().collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn library(id: u64, name: &str) -> Library {
        serde_json::from_value(json!({ "id": id, "name": name })).unwrap()
    }

    fn names(rows: &[Arc<Library>]) -> Vec<String> {
        rows.iter().map(|l| l.name.clone()).collect()
    }

    fn page(count: u64, items: Vec<Library>) -> Page<Library> {
        Page {
            count,
            next: None,
            previous: None,
            results: items,
        }
    }

    #[test]
    fn replace_page_keeps_server_order_and_count() {
        let list = EntityList::new(20);
        list.replace_page(
            page(45, vec![library(3, "Central"), library(1, "Annex")]),
            2,
        );

        assert_eq!(names(&list.snapshot()), ["Central", "Annex"]);
        assert_eq!(list.count(), 45);
        assert_eq!(list.total_pages(), 3);
        assert_eq!(list.current_page(), 2);
    }

    #[test]
    fn total_pages_follows_the_size_the_page_was_fetched_with() {
        let list = EntityList::new(20);
        list.replace_page_sized(page(45, vec![library(1, "A")]), 1, Some(10));
        assert_eq!(list.page_size(), 10);
        assert_eq!(list.total_pages(), 5);

        // No size recorded: the last one sticks.
        list.replace_page_sized(page(45, vec![library(1, "A")]), 2, None);
        assert_eq!(list.page_size(), 10);
        assert_eq!(list.total_pages(), 5);
    }

    #[test]
    fn upsert_patches_in_place() {
        let list = EntityList::new(20);
        list.replace_all(vec![library(1, "A"), library(2, "B"), library(3, "C")]);

        assert!(!list.upsert(library(2, "B renamed")));
        assert_eq!(names(&list.snapshot()), ["A", "B renamed", "C"]);
        assert_eq!(list.count(), 3);

        assert!(list.upsert(library(4, "D")));
        assert_eq!(list.count(), 4);
    }

    #[test]
    fn remove_preserves_order() {
        let list = EntityList::new(20);
        list.replace_all(vec![library(1, "A"), library(2, "B"), library(3, "C")]);

        let removed = list.remove(&EntityId::from(2u64)).unwrap();
        assert_eq!(removed.name, "B");
        assert_eq!(names(&list.snapshot()), ["A", "C"]);
        assert!(list.remove(&EntityId::from(2u64)).is_none());
        assert_eq!(list.count(), 2);
    }

    #[test]
    fn sorted_view_leaves_storage_alone() {
        let list = EntityList::new(20);
        list.replace_all(vec![library(1, "Beta"), library(2, "Alpha")]);

        let sorted = list.sorted_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(names(&sorted), ["Alpha", "Beta"]);
        assert_eq!(names(&list.snapshot()), ["Beta", "Alpha"]);
    }

    #[test]
    fn filtered_view() {
        let list = EntityList::new(20);
        list.replace_all(vec![library(1, "North"), library(2, "South")]);
        let rows = list.filtered(|l| l.name.starts_with('S'));
        assert_eq!(names(&rows), ["South"]);
    }

    #[test]
    fn subscribers_see_mutations() {
        let list: EntityList<Library> = EntityList::new(20);
        let mut rx = list.subscribe();
        list.upsert(library(1, "A"));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);
    }
}
