use crate::{Input, Model, Record};

use docket_core::{schema::FieldId, stmt::ChangeSet};

/// The fields a write may populate from untrusted input.
///
/// Created by [`Model::permit`] or [`Model::permit_all_except`]. Fields keep
/// the order they are declared in on the record type.
#[derive(Debug)]
pub struct Permit<'a, R: Record> {
    model: &'a Model<R>,
    fields: Vec<FieldId>,
}

impl<'a, R: Record> Permit<'a, R> {
    pub(crate) fn new(model: &'a Model<R>, fields: Vec<FieldId>) -> Permit<'a, R> {
        Permit { model, fields }
    }

    /// Declared names of the permitted fields.
    pub fn fields(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .map(|id| R::schema().field(*id).name.as_str())
            .collect()
    }

    pub fn is_permitted(&self, id: FieldId) -> bool {
        self.fields.contains(&id)
    }

    /// Keeps the permitted fields found in `input`, coerced to their types.
    /// Values that do not convert are dropped.
    pub fn filter(&self, input: impl Into<Input>) -> ChangeSet {
        self.filter_all([input.into()])
    }

    /// Like [`Permit::filter`] over several inputs. A field present in more
    /// than one input takes the value of the last one.
    pub fn filter_all(&self, inputs: impl IntoIterator<Item = Input>) -> ChangeSet {
        let mut changes = ChangeSet::new(R::schema());
        for input in inputs {
            let input = input.parse();
            self.model
                .collect(self.fields.iter().copied(), &input, &mut changes);
        }
        changes
    }
}
