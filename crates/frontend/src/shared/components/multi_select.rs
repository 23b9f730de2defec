use leptos::prelude::*;
use std::fmt::Display;
use thaw::*;

/// Selection after toggling `value`, kept in the order of `options`
fn toggle<T: PartialEq + Clone>(options: &[T], selected: &[T], value: &T, checked: bool) -> Vec<T> {
    options
        .iter()
        .filter(|option| {
            if *option == value {
                checked
            } else {
                selected.contains(option)
            }
        })
        .cloned()
        .collect()
}

/// Checkbox list bound to a selection signal.
///
/// An empty selection is allowed; the dashboard renders it as "no data".
#[component]
pub fn MultiSelect<T>(
    /// Caption above the list
    label: &'static str,
    /// Every selectable value, in display order
    #[prop(into)]
    options: Signal<Vec<T>>,
    /// Currently selected values
    selected: RwSignal<Vec<T>>,
) -> impl IntoView
where
    T: Display + Clone + PartialEq + Send + Sync + 'static,
{
    let id_prefix = label.to_lowercase().replace(' ', "-");

    view! {
        <div class="multi-select">
            <div class="multi-select__header">
                <span class="multi-select__label">{label}</span>
                <Button
                    size=ButtonSize::Small
                    appearance=ButtonAppearance::Subtle
                    on_click=move |_| selected.set(options.get())
                >
                    "All"
                </Button>
                <Button
                    size=ButtonSize::Small
                    appearance=ButtonAppearance::Subtle
                    on_click=move |_| selected.set(Vec::new())
                >
                    "None"
                </Button>
            </div>
            {move || {
                options
                    .get()
                    .into_iter()
                    .enumerate()
                    .map(|(i, value)| {
                        let checkbox_id = format!("{}-{}", id_prefix, i);
                        let text = value.to_string();
                        let is_checked = {
                            let value = value.clone();
                            move || selected.with(|s| s.contains(&value))
                        };
                        view! {
                            <div class="form__checkbox-wrapper">
                                <input
                                    id=checkbox_id.clone()
                                    type="checkbox"
                                    class="form__checkbox"
                                    prop:checked=is_checked
                                    on:change=move |ev| {
                                        let checked = event_target_checked(&ev);
                                        let next = selected
                                            .with(|s| toggle(&options.get(), s, &value, checked));
                                        selected.set(next);
                                    }
                                />
                                <label class="form__checkbox-label" for=checkbox_id>
                                    {text}
                                </label>
                            </div>
                        }
                    })
                    .collect_view()
            }}
        </div>
    }
}
