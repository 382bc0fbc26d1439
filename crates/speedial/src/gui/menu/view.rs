use super::model::Launcher;
use super::{GLYPH_ARM, GLYPH_WIDTH, ICON_FILL, LABEL_FONT_SIZE};
use crate::gui::theme::ThemeColors;
use cairo::Context;
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use palette::Srgba;
use speedial_core::element::{Backdrop, MainElement, Satellite};
use speedial_core::geometry::Point;
use std::f64::consts::PI;

fn set_source(cr: &Context, color: Srgba<f64>, opacity: f64) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a * opacity);
}

fn fill_circle(cr: &Context, center: Point, radius: f64) -> Result<(), cairo::Error> {
    cr.arc(center.x, center.y, radius, 0.0, 2.0 * PI);
    cr.fill()
}

struct SatelliteRenderer<'a> {
    satellite: &'a Satellite,
    pixbuf: Option<Pixbuf>,
}

impl<'a> SatelliteRenderer<'a> {
    fn new(satellite: &'a Satellite, launcher: &Launcher) -> Self {
        Self {
            satellite,
            pixbuf: satellite.icon.as_deref().and_then(|path| launcher.icon(path)),
        }
    }

    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        if self.satellite.opacity <= 0.0 {
            return Ok(());
        }
        set_source(cr, self.satellite.color, self.satellite.opacity);
        fill_circle(cr, self.satellite.center, self.satellite.radius)?;
        self.draw_content(cr, colors)
    }

    fn draw_content(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        if let Some(pixbuf) = &self.pixbuf {
            self.draw_icon(cr, pixbuf)
        } else if let Some(label) = &self.satellite.label {
            self.draw_text(cr, label, colors)
        } else {
            Ok(())
        }
    }

    fn draw_icon(&self, cr: &Context, pixbuf: &Pixbuf) -> Result<(), cairo::Error> {
        let side = self.satellite.radius * 2.0 * ICON_FILL;
        let scale = side / pixbuf.width().max(pixbuf.height()).max(1) as f64;
        let (iw, ih) = (
            pixbuf.width() as f64 * scale,
            pixbuf.height() as f64 * scale,
        );

        cr.save()?;
        cr.translate(
            self.satellite.center.x - iw / 2.0,
            self.satellite.center.y - ih / 2.0,
        );
        cr.scale(scale, scale);
        cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
        cr.paint_with_alpha(self.satellite.opacity)?;
        cr.restore()
    }

    fn draw_text(
        &self,
        cr: &Context,
        text: &str,
        colors: &ThemeColors,
    ) -> Result<(), cairo::Error> {
        set_source(cr, colors.label, self.satellite.opacity);
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(LABEL_FONT_SIZE);
        if let Ok(ext) = cr.text_extents(text) {
            // labels wider than the circle hang below it
            let y = if ext.width() > self.satellite.radius * 2.0 {
                self.satellite.center.y + self.satellite.radius + ext.height() + 4.0
            } else {
                self.satellite.center.y + ext.height() / 2.0
            };
            cr.move_to(self.satellite.center.x - ext.width() / 2.0, y);
            cr.show_text(text)?;
        }
        Ok(())
    }
}

fn draw_backdrop(cr: &Context, backdrop: &Backdrop) -> Result<(), cairo::Error> {
    let Some(frame) = backdrop.frame.filter(|_| backdrop.visible) else {
        return Ok(());
    };
    set_source(cr, backdrop.color, backdrop.opacity);
    cr.rectangle(frame.x, frame.y, frame.width, frame.height);
    cr.fill()
}

fn draw_main(cr: &Context, main: &MainElement, colors: &ThemeColors) -> Result<(), cairo::Error> {
    set_source(cr, main.color, 1.0);
    fill_circle(cr, main.center, main.radius)?;

    let arm = main.radius * GLYPH_ARM;
    cr.save()?;
    cr.translate(main.center.x, main.center.y);
    cr.rotate(main.rotation);
    set_source(cr, colors.label, 1.0);
    cr.set_line_width(GLYPH_WIDTH);
    cr.set_line_cap(cairo::LineCap::Round);
    cr.move_to(-arm, 0.0);
    cr.line_to(arm, 0.0);
    cr.move_to(0.0, -arm);
    cr.line_to(0.0, arm);
    cr.stroke()?;
    cr.restore()
}

/// Paints back to front so the main element always sits on top.
pub fn draw(
    cr: &Context,
    button: &speedial_core::ActionButton,
    launcher: &Launcher,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    cr.set_operator(cairo::Operator::Source);
    cr.set_source_rgba(0.0, 0.0, 0.0, 0.0);
    cr.paint()?;
    cr.set_operator(cairo::Operator::Over);

    draw_backdrop(cr, button.backdrop())?;
    for satellite in button.satellites() {
        SatelliteRenderer::new(satellite, launcher).draw(cr, colors)?;
    }
    draw_main(cr, button.main(), colors)
}
