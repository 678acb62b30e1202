use shadow_rs::ShadowBuilder;

fn main() {
    // Build metadata backing `biblioteca --version`
    ShadowBuilder::builder()
        .build()
        .expect("Failed to generate build metadata");
}
