//! An in-memory todo service, for testing workloads without launching the real one.

use std::collections::BTreeMap;

use load_gauge_core::prelude::Operation;

use crate::client::TodoApi;
use crate::error::ClientResult;
use crate::todo::Todo;

/// Behaves like the todo service: ids are assigned from 1, updating or deleting an unknown id
/// answers 404.
#[derive(Debug, Default)]
pub struct InMemoryTodos {
    todos: BTreeMap<u64, Todo>,
    next_id: u64,
    create_calls: u64,
    update_calls: u64,
    fail_create: Option<(u64, u16)>,
    fail_update: Option<(u64, u16)>,
    calls: Vec<(Operation, u64)>,
}

impl InMemoryTodos {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    /// Answer the `index`-th create request (1-based) with `status` instead of creating a todo.
    pub fn failing_create_at(mut self, index: u64, status: u16) -> Self {
        self.fail_create = Some((index, status));
        self
    }

    /// Answer the `index`-th update request (1-based, counted over every update received) with
    /// `status` instead of updating the todo.
    pub fn failing_update_at(mut self, index: u64, status: u16) -> Self {
        self.fail_update = Some((index, status));
        self
    }

    /// Every request received, with the id it targeted. Creates record the id that was assigned,
    /// or 0 if the create failed.
    pub fn calls(&self) -> &[(Operation, u64)] {
        &self.calls
    }

    pub fn calls_of(&self, operation: Operation) -> impl Iterator<Item = u64> + '_ {
        self.calls
            .iter()
            .filter(move |(op, _)| *op == operation)
            .map(|(_, id)| *id)
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Todo> {
        self.todos.get(&id)
    }
}

impl TodoApi for InMemoryTodos {
    fn create(&mut self, todo: &Todo) -> ClientResult<u16> {
        self.create_calls += 1;
        if let Some((index, status)) = self.fail_create {
            if index == self.create_calls {
                self.calls.push((Operation::Create, 0));
                return Ok(status);
            }
        }

        let id = self.next_id;
        self.next_id += 1;
        self.todos.insert(id, todo.clone());
        self.calls.push((Operation::Create, id));
        Ok(201)
    }

    fn update(&mut self, id: u64, todo: &Todo) -> ClientResult<u16> {
        self.update_calls += 1;
        self.calls.push((Operation::Update, id));
        if let Some((index, status)) = self.fail_update {
            if index == self.update_calls {
                return Ok(status);
            }
        }

        match self.todos.get_mut(&id) {
            Some(existing) => {
                *existing = todo.clone();
                Ok(200)
            }
            None => Ok(404),
        }
    }

    fn delete(&mut self, id: u64) -> ClientResult<u16> {
        self.calls.push((Operation::Delete, id));
        match self.todos.remove(&id) {
            Some(_) => Ok(200),
            None => Ok(404),
        }
    }
}
