macro_rules! all_the_tuples {
    ($name:ident) => {
        $name!([]);
        $name!([A]);
        $name!([A, B]);
        $name!([A, B, C]);
        $name!([A, B, C, D]);
        $name!([A, B, C, D, E]);
        $name!([A, B, C, D, E, F]);
        $name!([A, B, C, D, E, F, G]);
        $name!([A, B, C, D, E, F, G, H]);
        $name!([A, B, C, D, E, F, G, H, I]);
        $name!([A, B, C, D, E, F, G, H, I, J]);
        $name!([A, B, C, D, E, F, G, H, I, J, K]);
        $name!([A, B, C, D, E, F, G, H, I, J, K, L]);
    };
}
