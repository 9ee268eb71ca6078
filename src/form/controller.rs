use std::collections::BTreeSet;
use std::future::Future;

use crate::form::{Field, FieldErrors, Form, Schema};
use crate::notification::NotificationSink;
use crate::submission::Outcome;
use crate::translation::{MessageKey, Translate};

/// Lifecycle of a form instance.
///
/// `Succeeded` immediately resets to `Pristine`; `Failed` returns to `Editing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Pristine,
    Editing,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

/// Result of asking to submit.
#[derive(Debug, PartialEq, Eq)]
pub enum SubmitAttempt<V> {
    /// A submission is already in flight; the request was ignored.
    Busy,
    /// Validation failed; every error is now visible.
    Invalid,
    /// Valid values to send. The form is now `Submitting`.
    Ready(V),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitResult {
    Busy,
    Invalid,
    Completed(Outcome),
}

/// Holds a form's values, touched fields and errors, and drives its submission.
pub struct FormController<V: Form> {
    schema: Schema<V::Field>,
    values: V,
    touched: BTreeSet<V::Field>,
    errors: FieldErrors<V::Field>,
    state: FormState,
}

impl<V: Form> Default for FormController<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Form> FormController<V> {
    pub fn new() -> Self {
        Self {
            schema: V::schema(),
            values: V::default(),
            touched: BTreeSet::new(),
            errors: FieldErrors::default(),
            state: FormState::Pristine,
        }
    }

    /// Rebuilds a form from a snapshot of its values and touched fields.
    pub fn restore(values: V, touched: impl IntoIterator<Item = V::Field>) -> Self {
        let mut controller = Self::new();
        controller.values = values;
        controller.touched = touched.into_iter().collect();

        let has_input = <V::Field as Field>::ALL
            .iter()
            .any(|field| !controller.values.value(*field).is_empty());
        if has_input || !controller.touched.is_empty() {
            controller.state = FormState::Editing;
            controller.revalidate();
        }

        controller
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn values(&self) -> &V {
        &self.values
    }

    pub fn errors(&self) -> &FieldErrors<V::Field> {
        &self.errors
    }

    pub fn is_touched(&self, field: V::Field) -> bool {
        self.touched.contains(&field)
    }

    /// The error to display for `field`: only once the user has interacted with it.
    pub fn visible_error(&self, field: V::Field) -> Option<MessageKey> {
        if self.is_touched(field) {
            self.errors.get(field)
        } else {
            None
        }
    }

    pub fn visible_errors(&self) -> impl Iterator<Item = (V::Field, MessageKey)> + '_ {
        self.errors
            .iter()
            .filter(|(field, _)| self.touched.contains(field))
    }

    pub fn change(&mut self, field: V::Field, value: impl Into<String>) {
        self.values.set_value(field, value.into());

        if self.state == FormState::Pristine {
            self.transition(FormState::Editing);
        }

        let affects_touched = self.touched.contains(&field)
            || self
                .schema
                .dependents(field)
                .any(|dependent| self.touched.contains(&dependent));
        if affects_touched {
            self.revalidate();
        }
    }

    /// Applies every value of `values` as if the user had typed it.
    pub fn fill(&mut self, values: &V) {
        for field in <V::Field as Field>::ALL {
            self.change(*field, values.value(*field));
        }
    }

    pub fn blur(&mut self, field: V::Field) {
        self.touched.insert(field);

        if self.state == FormState::Pristine {
            self.transition(FormState::Editing);
        }

        self.revalidate();
    }

    /// Validates everything and, when valid, hands out the values to send.
    pub fn begin_submit(&mut self) -> SubmitAttempt<V> {
        if self.state == FormState::Submitting {
            log::debug!("ignoring submit while a submission is in flight");
            return SubmitAttempt::Busy;
        }

        self.touched.extend(<V::Field as Field>::ALL.iter().copied());
        self.transition(FormState::Validating);
        self.revalidate();

        if !self.errors.is_empty() {
            self.transition(FormState::Editing);
            return SubmitAttempt::Invalid;
        }

        self.transition(FormState::Submitting);
        SubmitAttempt::Ready(self.values.clone())
    }

    /// Reports the outcome of the in-flight submission.
    ///
    /// Success resets the form; failure keeps values and touched fields as they are.
    pub fn complete(
        &mut self,
        outcome: &Outcome,
        messages: &impl Translate,
        sink: &impl NotificationSink,
    ) {
        if self.state != FormState::Submitting {
            log::warn!(
                "ignoring submission outcome {outcome:?} in state {:?}",
                self.state
            );
            return;
        }

        let text = messages.text(outcome.key().as_str());

        match outcome {
            Outcome::Success(_) => {
                self.transition(FormState::Succeeded);
                sink.show_success(text);
                self.reset();
            }
            Outcome::Failure(_) => {
                self.transition(FormState::Failed);
                sink.show_error(text);
                self.transition(FormState::Editing);
            }
        }
    }

    /// Validates, sends through `send` when valid, and reports the outcome.
    pub async fn submit<Fut>(
        &mut self,
        send: impl FnOnce(V) -> Fut,
        messages: &impl Translate,
        sink: &impl NotificationSink,
    ) -> SubmitResult
    where
        Fut: Future<Output = Outcome>,
    {
        let values = match self.begin_submit() {
            SubmitAttempt::Ready(values) => values,
            SubmitAttempt::Invalid => return SubmitResult::Invalid,
            SubmitAttempt::Busy => return SubmitResult::Busy,
        };

        let outcome = send(values).await;
        self.complete(&outcome, messages, sink);

        SubmitResult::Completed(outcome)
    }

    pub fn reset(&mut self) {
        self.values = V::default();
        self.touched.clear();
        self.errors = FieldErrors::default();
        self.transition(FormState::Pristine);
    }

    fn revalidate(&mut self) {
        self.errors = self.schema.validate(&self.values);
    }

    fn transition(&mut self, next: FormState) {
        log::debug!("form state {:?} -> {next:?}", self.state);
        self.state = next;
    }
}
