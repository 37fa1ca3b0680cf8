macro_rules! def_units {
    ($t: ident, $doc: literal) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Eq, PartialEq)]
        pub struct $t<T>(pub T);

        impl<T> $t<T> {
            pub fn into_inner(self) -> T {
                self.0
            }
        }
    };
}

def_units!(
    SampleUnits,
    "Denotes that the inner `T` is given in height field samples, with x along columns and z along rows."
);
def_units!(WorldUnits, "Denotes that the inner `T` is given in world space units.");
