mod store;

use clap::Parser;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use thermothin_core::{
    process_request, simulate, Action, BodySpec, Celsius, CoolingCurve, MaterialCatalog,
    MaterialSelector, Orientation, Shape, SimulationConfig,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::store::JsonVariantStore;

/// Cooling curve of a thermally-thin body in still air
#[derive(Parser, Debug)]
#[command(name = "thermothin-demo")]
#[command(
    about = "Lumped-capacitance cooling by natural convection and radiation",
    long_about = None
)]
#[expect(clippy::struct_excessive_bools)]
struct Args {
    /// Read the body specification from a JSON file (overrides body flags)
    #[arg(long)]
    spec: Option<PathBuf>,

    /// Body shape (sphere, cylinder, plate)
    #[arg(short, long, default_value = "sphere")]
    shape: Shape,

    /// Orientation for cylinders and plates (vertical, horizontal)
    #[arg(short, long)]
    orientation: Option<Orientation>,

    /// Radius in m (sphere, cylinder)
    #[arg(short, long, default_value_t = 0.01)]
    radius: f64,

    /// Length in m (plate)
    #[arg(long, default_value_t = 0.0)]
    length: f64,

    /// Width in m (plate)
    #[arg(long, default_value_t = 0.0)]
    width: f64,

    /// Height in m (cylinder, plate thickness)
    #[arg(long, default_value_t = 0.0)]
    height: f64,

    /// Initial body temperature in °C
    #[arg(short = 'T', long, default_value_t = 100.0)]
    initial_temperature: f64,

    /// Ambient air temperature in °C
    #[arg(short, long, default_value_t = 20.0)]
    ambient_temperature: f64,

    /// Surface emissivity (0-1)
    #[arg(short, long, default_value_t = 0.8)]
    emissivity: f64,

    /// Cooling duration in seconds
    #[arg(short = 't', long, default_value_t = 60.0)]
    cooling_time: f64,

    /// Catalog material key (see --list-materials)
    #[arg(short, long, default_value = "steel")]
    material: String,

    /// Custom density in kg/m³ (with --custom-heat-capacity and --custom-conductivity)
    #[arg(long, requires = "custom_heat_capacity")]
    custom_density: Option<f64>,

    /// Custom heat capacity in J/(kg·K)
    #[arg(long, requires = "custom_conductivity")]
    custom_heat_capacity: Option<f64>,

    /// Custom thermal conductivity in W/(m·K)
    #[arg(long, requires = "custom_density")]
    custom_conductivity: Option<f64>,

    /// Number of time steps (samples = steps + 1)
    #[arg(long, default_value_t = SimulationConfig::DEFAULT_STEPS)]
    steps: usize,

    /// Keep material properties at their initial values
    #[arg(long)]
    frozen_properties: bool,

    /// Append the run to this variants file after a successful run
    #[arg(long)]
    save: Option<PathBuf>,

    /// Variants file used by --list-variants, --load and --delete
    #[arg(long)]
    variants: Option<PathBuf>,

    /// Print the saved variants and exit
    #[arg(long, requires = "variants")]
    list_variants: bool,

    /// Re-run the saved variant with this id (overrides body flags)
    #[arg(long, value_name = "ID", requires = "variants", conflicts_with = "spec")]
    load: Option<u64>,

    /// Delete the saved variant with this id and exit
    #[arg(long, value_name = "ID", requires = "variants", conflicts_with = "load")]
    delete: Option<u64>,

    /// Print the built-in material catalog and exit
    #[arg(long)]
    list_materials: bool,

    /// Print the curve as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    fn material(&self) -> MaterialSelector {
        match (self.custom_density, self.custom_heat_capacity, self.custom_conductivity) {
            (Some(density), Some(heat_capacity), Some(conductivity)) => MaterialSelector::Custom {
                density,
                heat_capacity,
                conductivity,
            },
            _ => MaterialSelector::Named(self.material.clone()),
        }
    }

    fn body_spec(&self) -> Result<BodySpec, Box<dyn Error>> {
        if let (Some(id), Some(path)) = (self.load, &self.variants) {
            let store = JsonVariantStore::open(path)?;
            let variant = store
                .get(id)
                .ok_or_else(|| format!("No variant {id} in {}", path.display()))?;
            info!(id, "Loaded saved variant");
            return Ok(variant.to_spec());
        }

        if let Some(path) = &self.spec {
            let contents = fs::read_to_string(path)
                .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
            return Ok(serde_json::from_str(&contents)?);
        }

        Ok(BodySpec {
            shape: self.shape,
            orientation: self.orientation,
            length: self.length,
            width: self.width,
            height: self.height,
            radius: self.radius,
            initial_temperature: self.initial_temperature,
            ambient_temperature: self.ambient_temperature,
            emissivity: self.emissivity,
            cooling_time: self.cooling_time,
            material: self.material(),
        })
    }

    fn config(&self) -> SimulationConfig {
        SimulationConfig {
            steps: self.steps,
            refresh_material_properties: !self.frozen_properties,
        }
    }
}

fn list_materials(catalog: &MaterialCatalog) {
    let reference = Celsius::new(20.0);
    println!("Key              | Name                      | ρ (kg/m³) | c (J/kg·K) | k (W/m·K)");
    println!("-----------------|---------------------------|-----------|------------|----------");
    for key in catalog.keys() {
        if let Some(material) = catalog.get(key) {
            let props = material.properties_at(reference);
            println!(
                "{:16} | {:25} | {:9.0} | {:10.1} | {:9.2}",
                key, material.name, props.density, props.heat_capacity, props.conductivity
            );
        }
    }
}

fn print_curve(curve: &CoolingCurve) {
    let init = &curve.initial;
    println!("=== Cooling Curve: {} ===\n", init.material_name);
    println!("Surface area:          {:.6} m²", init.surface_area);
    println!("Volume:                {:.3e} m³", init.volume);
    println!("Mass:                  {:.4} kg", init.mass);
    println!("Characteristic length: {:.4} m", init.characteristic_length);
    println!(
        "Air at ambient:        ν = {:.3e} m²/s, Pr = {:.4}",
        init.air.kinematic_viscosity, init.air.prandtl_number
    );
    println!(
        "Coefficients:          α_rad = {:.3}, α_conv = {:.3}, α_sum = {:.3} W/(m²·K)",
        init.coefficients.radiative, init.coefficients.convective, init.coefficients.total
    );
    println!(
        "Correlation:           {:?} (Ra = {:.3e})",
        init.coefficients.correlation, init.coefficients.rayleigh
    );
    println!("Biot number:           {:.5}", init.biot_number);
    println!("Time constant:         {:.1} s\n", init.time_constant);

    println!("Time(s) | T(°C)    | Bi      | c (J/kg·K) | k (W/m·K)");
    println!("--------|----------|---------|------------|----------");
    for sample in &curve.samples {
        println!(
            "{:7.1} | {:8.3} | {:.5} | {:10.2} | {:9.3}",
            sample.time,
            *sample.temperature,
            sample.biot_number,
            sample.heat_capacity,
            sample.conductivity
        );
    }
}

fn list_variants(store: &JsonVariantStore) {
    println!("ID    | Shape    | Orientation | Material         | T₀ (°C) | T∞ (°C) | τ (s)");
    println!("------|----------|-------------|------------------|---------|---------|-------");
    for variant in store.variants() {
        let body = &variant.body;
        let id = variant.id.map_or_else(|| "-".to_string(), |v| v.to_string());
        let orientation = body.orientation.map_or_else(|| "-".to_string(), |v| v.to_string());
        println!(
            "{:5} | {:8} | {:11} | {:16} | {:7.1} | {:7.1} | {:6.1}",
            id,
            body.shape.as_str(),
            orientation,
            body.material.key(),
            body.initial_temperature,
            body.ambient_temperature,
            body.cooling_time
        );
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let catalog = MaterialCatalog::builtin();

    if args.list_materials {
        list_materials(&catalog);
        return Ok(());
    }

    if let Some(path) = &args.variants {
        if args.list_variants {
            list_variants(&JsonVariantStore::open(path)?);
            return Ok(());
        }
        if let Some(id) = args.delete {
            let mut store = JsonVariantStore::open(path)?;
            if !store.delete(id)? {
                return Err(format!("No variant {id} in {}", path.display()).into());
            }
            eprintln!("Deleted variant {id} from {}", path.display());
            return Ok(());
        }
    }

    let spec = args.body_spec()?;
    let config = args.config();
    info!(
        shape = %spec.shape,
        material = spec.material.key(),
        steps = config.steps,
        "Starting cooling run"
    );

    let curve = if let Some(path) = &args.save {
        let mut store = JsonVariantStore::open(path)?;
        let (curve, id) =
            process_request(&spec, Action::ComputeAndPersist, &catalog, &config, &mut store)?;
        if let Some(id) = id {
            eprintln!(
                "Saved variant {id} to {} ({} stored)",
                path.display(),
                store.variants().len()
            );
        }
        curve
    } else {
        simulate(&spec, &catalog, &config)?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&curve)?);
    } else {
        print_curve(&curve);
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
