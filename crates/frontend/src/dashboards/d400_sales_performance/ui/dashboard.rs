use crate::dashboards::d400_sales_performance::api;
use crate::shared::charts::ChartView;
use crate::shared::components::{KpiCard, MultiSelect};
use contracts::dashboards::d400_sales_performance::{
    Branding, Category, FilterOptionsResponse, Panel, PanelId, PanelSlot, Region,
    SalesDashboardResponse, SalesFilterRequest,
};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

const FOOTER: &str = "Developed with Leptos and axum";

/// Numbers dashboard requests; only the response to the latest one is applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct RequestSeq {
    latest: u64,
}

impl RequestSeq {
    /// Registers a new request and returns its number
    fn next(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    /// False once a newer request has been issued
    fn is_current(&self, seq: u64) -> bool {
        seq == self.latest
    }
}

/// Sales Performance Dashboard: sidebar filters, KPI row and five chart tabs
#[component]
pub fn SalesPerformanceDashboard() -> impl IntoView {
    // Filter state
    let options = RwSignal::new(None::<FilterOptionsResponse>);
    let selected_regions = RwSignal::new(Vec::<Region>::new());
    let selected_categories = RwSignal::new(Vec::<Category>::new());

    // Data state
    let data = RwSignal::new(None::<SalesDashboardResponse>);
    let loading = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);
    let branding = RwSignal::new(None::<Branding>);
    let active_tab = RwSignal::new(PanelId::TimeSeries);

    // Only the latest request may update the view
    let request_seq = StoredValue::new(RequestSeq::default());

    // Load filter options and branding on mount
    Effect::new(move |_| {
        spawn_local(async move {
            match api::get_filter_options().await {
                Ok(response) => {
                    // Default selection is the full domain
                    selected_regions.set(response.regions.clone());
                    selected_categories.set(response.categories.clone());
                    options.set(Some(response));
                }
                Err(e) => {
                    log::error!("Failed to load D400 filter options: {}", e);
                    error.set(Some(e));
                }
            }
        });
        spawn_local(async move {
            match api::get_branding().await {
                Ok(response) => branding.set(Some(response)),
                Err(e) => log::error!("Failed to load D400 branding: {}", e),
            }
        });
    });

    // Re-run the pipeline whenever the selection changes
    Effect::new(move |_| {
        let regions = selected_regions.get();
        let categories = selected_categories.get();
        if options.with(|o| o.is_none()) {
            return;
        }

        let mut sequence = request_seq.get_value();
        let seq = sequence.next();
        request_seq.set_value(sequence);
        loading.set(true);

        let request = SalesFilterRequest::new(regions, categories);
        spawn_local(async move {
            let result = api::get_sales_performance(&request).await;
            if !request_seq.get_value().is_current(seq) {
                log::debug!("D400: dropping stale response #{}", seq);
                return;
            }
            match result {
                Ok(response) => {
                    error.set(None);
                    data.set(Some(response));
                }
                Err(e) => {
                    log::error!("Failed to load D400 dashboard: {}", e);
                    error.set(Some(e));
                }
            }
            loading.set(false);
        });
    });

    let region_options = Signal::derive(move || {
        options.with(|o| o.as_ref().map(|o| o.regions.clone()).unwrap_or_default())
    });
    let category_options = Signal::derive(move || {
        options.with(|o| o.as_ref().map(|o| o.categories.clone()).unwrap_or_default())
    });

    view! {
        <div id="d400_sales_performance--dashboard" class="d400-layout">
            <aside class="d400-sidebar">
                <BrandingView branding=branding />
                <h2 class="d400-sidebar__header">"Filters"</h2>
                <MultiSelect label="Select Regions" options=region_options selected=selected_regions />
                <MultiSelect
                    label="Select Categories"
                    options=category_options
                    selected=selected_categories
                />
                <div class="d400-sidebar__footer">{FOOTER}</div>
            </aside>

            <main class="d400-main">
                {move || {
                    data.with(|d| {
                        d.as_ref()
                            .map(|d| {
                                view! {
                                    <h1 class="d400-title">{d.title.clone()}</h1>
                                    <p class="d400-subtitle">{d.subtitle.clone()}</p>
                                }
                            })
                    })
                }}

                {move || {
                    error
                        .get()
                        .map(|err| {
                            view! {
                                <MessageBar intent=MessageBarIntent::Error>
                                    <strong>"Error: "</strong>
                                    {err}
                                </MessageBar>
                            }
                        })
                }}

                <Show when=move || loading.get()>
                    <div class="d400-loading">"Loading data..."</div>
                </Show>

                <div class="d400-kpis">
                    {move || {
                        data.with(|d| {
                            d.as_ref()
                                .map(|d| d.kpis.clone())
                                .unwrap_or_default()
                                .into_iter()
                                .map(|kpi| view! { <KpiCard kpi=kpi /> })
                                .collect_view()
                        })
                    }}
                </div>

                <div class="d400-tabs">
                    {PanelId::ALL
                        .into_iter()
                        .map(|id| {
                            view! {
                                <Button
                                    size=ButtonSize::Small
                                    appearance=Signal::derive(move || {
                                        if active_tab.get() == id {
                                            ButtonAppearance::Primary
                                        } else {
                                            ButtonAppearance::Subtle
                                        }
                                    })
                                    on_click=move |_| active_tab.set(id)
                                >
                                    {id.label()}
                                </Button>
                            }
                        })
                        .collect_view()}
                </div>

                {move || {
                    let tab = active_tab.get();
                    data.with(|d| {
                        d.as_ref()
                            .and_then(|d| d.panels.iter().find(|p| p.id == tab).cloned())
                            .map(|panel| view! { <PanelView panel=panel /> })
                    })
                }}
            </main>
        </div>
    }
}

#[component]
fn BrandingView(branding: RwSignal<Option<Branding>>) -> impl IntoView {
    move || match branding.get() {
        Some(logo @ Branding::Logo { .. }) => {
            view! { <img class="d400-sidebar__logo" src=logo.data_url() alt="Logo" /> }.into_any()
        }
        Some(Branding::Missing { notice }) => {
            view! { <div class="d400-sidebar__no-logo">{notice}</div> }.into_any()
        }
        None => view! { <></> }.into_any(),
    }
}

#[component]
fn PanelView(panel: Panel) -> impl IntoView {
    let slots = panel
        .slots
        .into_iter()
        .map(|slot| match slot {
            PanelSlot::Chart(spec) => view! { <ChartView spec=spec /> }.into_any(),
            PanelSlot::Notice { text } => view! {
                <MessageBar intent=MessageBarIntent::Info>{text}</MessageBar>
            }
            .into_any(),
        })
        .collect_view();

    view! {
        <section class="d400-panel">
            <h2 class="d400-panel__heading">{panel.heading}</h2>
            <div class="d400-panel__charts">{slots}</div>
        </section>
    }
}
