use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use uuid::Uuid;

use super::{Collection, Row, StoreError, StoreHandle, TableStore};

#[derive(Debug, Default)]
struct TenantTables {
    teachers: Vec<Row>,
    students: Vec<Row>,
    classes: Vec<Row>,
    attendance: Vec<Row>,
}

impl TenantTables {
    fn table(&self, collection: Collection) -> &Vec<Row> {
        match collection {
            Collection::Teachers => &self.teachers,
            Collection::Students => &self.students,
            Collection::Classes => &self.classes,
            Collection::Attendance => &self.attendance,
        }
    }

    fn table_mut(&mut self, collection: Collection) -> &mut Vec<Row> {
        match collection {
            Collection::Teachers => &mut self.teachers,
            Collection::Students => &mut self.students,
            Collection::Classes => &mut self.classes,
            Collection::Attendance => &mut self.attendance,
        }
    }
}

/// In-memory table store. One write lock spans each operation, so every
/// insert/update/delete/batch is atomic and id assignment cannot race.
#[derive(Debug, Default)]
pub struct MemoryEngine {
    stores: RwLock<HashMap<StoreHandle, TenantTables>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TableStore for MemoryEngine {
    async fn create_store(&self) -> Result<StoreHandle, StoreError> {
        let handle = StoreHandle::new();
        self.stores.write().insert(handle, TenantTables::default());
        Ok(handle)
    }

    async fn list(&self, handle: StoreHandle, collection: Collection) -> Result<Vec<Row>, StoreError> {
        let stores = self.stores.read();
        let tables = stores.get(&handle).ok_or(StoreError::Unavailable(handle))?;
        Ok(tables.table(collection).clone())
    }

    async fn insert(
        &self,
        handle: StoreHandle,
        collection: Collection,
        fields: Value,
    ) -> Result<Uuid, StoreError> {
        let mut stores = self.stores.write();
        let tables = stores.get_mut(&handle).ok_or(StoreError::Unavailable(handle))?;
        let id = Uuid::new_v4();
        tables.table_mut(collection).push(Row { id, fields });
        Ok(id)
    }

    async fn update(
        &self,
        handle: StoreHandle,
        collection: Collection,
        id: Uuid,
        fields: Value,
    ) -> Result<(), StoreError> {
        let mut stores = self.stores.write();
        let tables = stores.get_mut(&handle).ok_or(StoreError::Unavailable(handle))?;
        let table = tables.table_mut(collection);
        match table.iter_mut().find(|row| row.id == id) {
            Some(row) => {
                row.fields = fields;
                Ok(())
            }
            None => Err(StoreError::NotFound { collection, id }),
        }
    }

    async fn delete(
        &self,
        handle: StoreHandle,
        collection: Collection,
        id: Uuid,
    ) -> Result<(), StoreError> {
        let mut stores = self.stores.write();
        let tables = stores.get_mut(&handle).ok_or(StoreError::Unavailable(handle))?;
        let table = tables.table_mut(collection);
        match table.iter().position(|row| row.id == id) {
            Some(index) => {
                table.remove(index);
                Ok(())
            }
            None => Err(StoreError::NotFound { collection, id }),
        }
    }

    async fn append_batch(
        &self,
        handle: StoreHandle,
        collection: Collection,
        rows: Vec<Value>,
    ) -> Result<Vec<Uuid>, StoreError> {
        let mut stores = self.stores.write();
        let tables = stores.get_mut(&handle).ok_or(StoreError::Unavailable(handle))?;
        let table = tables.table_mut(collection);
        let mut ids = Vec::with_capacity(rows.len());
        for fields in rows {
            let id = Uuid::new_v4();
            table.push(Row { id, fields });
            ids.push(id);
        }
        Ok(ids)
    }
}
