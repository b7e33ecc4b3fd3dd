use crate::features::{derive_features, FeatureVector};
use crate::model::{
    AdIntensity, IncomeBucket, PredictionRequest, PriceBucket, ProductType, Verdict, AGE_RANGE,
    CREDIT_RANGE, DISCOUNT_RANGE,
};
use crate::scorer::{score, Classifier};
use eframe::egui;
use egui::{Color32, Context, FontFamily, FontId, Margin, RichText, Stroke, Visuals};
use egui_extras::{Column, TableBuilder};
use tracing::{debug, error};

const ACCENT: Color32 = Color32::from_rgb(6, 214, 160);
const FAILURE: Color32 = Color32::from_rgb(239, 71, 111);

pub fn set_custom_style(ctx: &Context) {
    let mut visuals = Visuals::dark();

    visuals.panel_fill = Color32::from_rgb(22, 26, 33);
    visuals.window_fill = Color32::from_rgb(30, 35, 44);
    visuals.extreme_bg_color = Color32::from_rgb(40, 46, 58);
    visuals.faint_bg_color = Color32::from_rgb(34, 39, 49);

    visuals.widgets.inactive.bg_fill = Color32::from_rgb(44, 51, 64);
    visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, Color32::from_rgb(70, 80, 98));

    visuals.widgets.hovered.bg_fill = Color32::from_rgb(56, 66, 82);
    visuals.widgets.hovered.bg_stroke = Stroke::new(2.0, ACCENT);

    visuals.widgets.active.bg_fill = Color32::from_rgb(64, 76, 94);
    visuals.widgets.active.bg_stroke = Stroke::new(2.0, ACCENT);

    visuals.selection.bg_fill = Color32::from_rgb(20, 110, 90);
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);

    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();

    style.spacing.item_spacing = egui::vec2(8.0, 8.0);
    style.spacing.window_margin = Margin::same(12);
    style.spacing.button_padding = egui::vec2(12.0, 8.0);
    style.spacing.slider_width = 220.0;

    style.text_styles.insert(egui::TextStyle::Body, FontId::new(15.0, FontFamily::Proportional));
    style.text_styles.insert(egui::TextStyle::Heading, FontId::new(22.0, FontFamily::Proportional));
    style.text_styles.insert(egui::TextStyle::Button, FontId::new(15.0, FontFamily::Proportional));
    style.text_styles.insert(egui::TextStyle::Monospace, FontId::new(14.0, FontFamily::Monospace));

    ctx.set_style(style);
}

enum Notice {
    Result { verdict: Verdict, message: String },
    Failure(String),
}

// Widget values, only read when Predict is clicked.
struct FormState {
    ad_intensity: AdIntensity,
    product_type: ProductType,
    income_bucket: IncomeBucket,
    price_bucket: PriceBucket,
    discount_pct: u32,
    credit_score: u32,
    age: u32,
}

impl FormState {
    fn new() -> Self {
        let d = PredictionRequest::default();
        FormState {
            ad_intensity: d.ad_intensity,
            product_type: d.product_type,
            income_bucket: d.income_bucket,
            price_bucket: d.price_bucket,
            discount_pct: d.discount_pct,
            credit_score: d.credit_score,
            age: d.age,
        }
    }

    fn to_request(&self) -> PredictionRequest {
        PredictionRequest {
            ad_intensity: self.ad_intensity,
            product_type: self.product_type,
            income_bucket: self.income_bucket,
            price_bucket: self.price_bucket,
            discount_pct: self.discount_pct,
            credit_score: self.credit_score,
            age: self.age,
        }
    }
}

pub struct PredictorApp {
    classifier: Box<dyn Classifier>,
    form: FormState,
    notice: Option<Notice>,
    last_features: Option<FeatureVector>,
}

impl PredictorApp {
    pub fn new(classifier: Box<dyn Classifier>) -> Self {
        Self {
            classifier,
            form: FormState::new(),
            notice: None,
            last_features: None,
        }
    }

    fn on_predict(&mut self) {
        let req = self.form.to_request();
        debug!(?req, "predict clicked");
        let features = derive_features(&req);

        self.notice = Some(match score(&features, self.classifier.as_ref()) {
            Ok(p) => Notice::Result { verdict: p.verdict, message: p.message() },
            Err(e) => {
                error!("Prediction failed: {}", e);
                Notice::Failure(e.to_string())
            }
        });
        self.last_features = Some(features);
    }

    fn form_grid(&mut self, ui: &mut egui::Ui) {
        let form = &mut self.form;

        egui::Grid::new("campaign_form")
            .num_columns(2)
            .spacing([16.0, 10.0])
            .show(ui, |ui| {
                ui.label("📢 Ad Intensity");
                egui::ComboBox::from_id_salt("ad_intensity")
                    .selected_text(form.ad_intensity.label())
                    .width(220.0)
                    .show_ui(ui, |ui| {
                        for ad in AdIntensity::ALL {
                            ui.selectable_value(&mut form.ad_intensity, ad, ad.label());
                        }
                    });
                ui.end_row();

                ui.label("🛍 Product Type");
                egui::ComboBox::from_id_salt("product_type")
                    .selected_text(form.product_type.label())
                    .width(220.0)
                    .show_ui(ui, |ui| {
                        for product in ProductType::ALL {
                            ui.selectable_value(&mut form.product_type, product, product.label());
                        }
                    });
                ui.end_row();

                ui.label("💰 Annual Income");
                egui::ComboBox::from_id_salt("income")
                    .selected_text(form.income_bucket.label())
                    .width(220.0)
                    .show_ui(ui, |ui| {
                        for bucket in IncomeBucket::ALL {
                            ui.selectable_value(&mut form.income_bucket, bucket, bucket.label());
                        }
                    });
                ui.end_row();

                ui.label("🏷 Product Price");
                egui::ComboBox::from_id_salt("price")
                    .selected_text(form.price_bucket.label())
                    .width(220.0)
                    .show_ui(ui, |ui| {
                        for bucket in PriceBucket::ALL {
                            ui.selectable_value(&mut form.price_bucket, bucket, bucket.label());
                        }
                    });
                ui.end_row();

                ui.label("Discount (%)");
                ui.add(egui::Slider::new(&mut form.discount_pct, DISCOUNT_RANGE));
                ui.end_row();

                ui.label("Credit Score");
                ui.add(egui::Slider::new(&mut form.credit_score, CREDIT_RANGE));
                ui.end_row();

                ui.label("Age");
                ui.add(egui::Slider::new(&mut form.age, AGE_RANGE));
                ui.end_row();
            });
    }

    fn features_table(&self, ui: &mut egui::Ui) {
        let Some(features) = &self.last_features else {
            ui.label(RichText::new("Press Predict to see the model inputs").weak());
            return;
        };

        TableBuilder::new(ui)
            .striped(true)
            .vscroll(true)
            .max_scroll_height(240.0)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::remainder().at_least(200.0))
            .column(Column::exact(140.0))
            .header(24.0, |mut header| {
                header.col(|ui| {
                    ui.strong("Feature");
                });
                header.col(|ui| {
                    ui.strong("Value");
                });
            })
            .body(|mut body| {
                for (name, value) in features.iter() {
                    body.row(20.0, |mut row| {
                        row.col(|ui| {
                            ui.label(name);
                        });
                        row.col(|ui| {
                            ui.monospace(format!("{:.4}", value));
                        });
                    });
                }
            });
    }

    fn notice_window(&mut self, ctx: &Context) {
        let Some(notice) = &self.notice else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new("Prediction")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                match notice {
                    Notice::Result { verdict, message } => {
                        let color = match verdict {
                            Verdict::Yes => ACCENT,
                            Verdict::No => FAILURE,
                        };
                        ui.label(RichText::new(message).size(18.0).color(color));
                    }
                    Notice::Failure(reason) => {
                        ui.label(RichText::new("Prediction failed").strong().color(FAILURE));
                        ui.label(reason);
                    }
                }
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });

        if dismissed {
            self.notice = None;
        }
    }
}

impl eframe::App for PredictorApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.heading(
                RichText::new("Marketing Campaign Success Predictor")
                    .color(ACCENT)
                    .strong(),
            );
            ui.add_space(4.0);
        });

        let blocked = self.notice.is_some();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!blocked, |ui| {
                self.form_grid(ui);

                ui.add_space(12.0);
                let label = RichText::new("Predict").strong().color(Color32::BLACK);
                let predict_button = egui::Button::new(label)
                    .fill(ACCENT)
                    .min_size(egui::vec2(120.0, 34.0));
                if ui.add(predict_button).clicked() {
                    self.on_predict();
                }

                ui.add_space(12.0);
                ui.separator();
                egui::CollapsingHeader::new("Derived features")
                    .default_open(false)
                    .show(ui, |ui| self.features_table(ui));
            });
        });

        self.notice_window(ctx);
    }
}
