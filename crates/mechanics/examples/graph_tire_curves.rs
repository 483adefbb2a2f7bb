use mechanics::tire::{PacejkaFormula, PacejkaParams};
use plotters::prelude::*;

fn draw_series(
    filename: &str,
    title: &str,
    x_label: &str,
    y_label: &str,
    x: &[f64],
    y: &[f64],
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(filename, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let x_min = x.iter().cloned().fold(f64::INFINITY, |a, b| a.min(b));
    let x_max = x.iter().cloned().fold(f64::NEG_INFINITY, |a, b| a.max(b));
    let y_min = y.iter().cloned().fold(f64::INFINITY, |a, b| a.min(b));
    let y_max = y.iter().cloned().fold(f64::NEG_INFINITY, |a, b| a.max(b));

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("Arial", 28))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart.configure_mesh().x_desc(x_label).y_desc(y_label).draw()?;

    chart
        .draw_series(LineSeries::new(x.iter().cloned().zip(y.iter().cloned()), &BLUE))?
        .label("force")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.filled()));

    chart.configure_series_labels().border_style(&BLACK).draw()?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let tire_load = 4000.0;
    let tire = PacejkaFormula::new(PacejkaParams::sport_tire());

    // 1) Lateral force vs slip angle, zero camber.
    let mut alphas = Vec::new();
    let mut fy = Vec::new();
    for alpha_deg in (-900..=900).map(|d| d as f64 / 10.0) {
        alphas.push(alpha_deg);
        fy.push(tire.lateral_force(alpha_deg, tire_load, 0.0));
    }

    draw_series(
        "lateral_vs_slip_angle.png",
        "Lateral Force vs Slip Angle",
        "Slip Angle [deg]",
        "Lateral Force Fy [N]",
        &alphas,
        &fy,
    )?;

    // 2) Longitudinal force vs slip ratio.
    let mut kappas = Vec::new();
    let mut fx = Vec::new();
    let n = 301;
    for i in 0..n {
        let kappa = -0.5 + (i as f64) / ((n - 1) as f64);
        kappas.push(kappa);
        fx.push(tire.longitudinal_force(kappa, tire_load));
    }

    draw_series(
        "longitudinal_vs_slip_ratio.png",
        "Longitudinal Force vs Slip Ratio",
        "Slip Ratio [-]",
        "Longitudinal Force Fx [N]",
        &kappas,
        &fx,
    )?;

    println!("Wrote plots: lateral_vs_slip_angle.png, longitudinal_vs_slip_ratio.png");

    Ok(())
}
